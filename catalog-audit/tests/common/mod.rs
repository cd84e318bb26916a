//! Project tree fixtures for integration tests

#![allow(dead_code)]

use catalog_common::{AuditConfig, CatalogExpectations, SourceLayout};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One catalog entry of a fixture project
#[derive(Debug, Clone)]
pub struct FixtureService {
    pub id: String,
    pub component: String,
    pub category: String,
    pub directory: String,
    pub interface_file: String,
}

/// A project tree laid out the way [`SourceLayout::default`] expects
pub struct ProjectFixture {
    _tmp: TempDir,
    pub root: PathBuf,
    pub layout: SourceLayout,
    pub services: Vec<FixtureService>,
}

impl ProjectFixture {
    /// Consistent project matching the default 59-entry catalog
    pub fn consistent() -> Self {
        Self::for_catalog(&CatalogExpectations::default())
    }

    /// Consistent project with `expected_count` services per category
    pub fn for_catalog(catalog: &CatalogExpectations) -> Self {
        let services = catalog
            .categories
            .iter()
            .flat_map(|category| {
                (0..category.expected_count).map(move |i| FixtureService {
                    id: format!("{}-{}", category.directory.to_lowercase(), i + 1),
                    component: format!("{}Service{}", category.directory, i + 1),
                    category: category.name.clone(),
                    directory: category.directory.clone(),
                    interface_file: category.interface_file.clone(),
                })
            })
            .collect();
        Self::with_services(services)
    }

    pub fn with_services(services: Vec<FixtureService>) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        let fixture = Self {
            _tmp: tmp,
            root,
            layout: SourceLayout::default(),
            services,
        };
        fixture.write_all();
        fixture
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.layout.mapping_source_path(&self.root)
    }

    pub fn components_root(&self) -> PathBuf {
        self.layout.components_root_path(&self.root)
    }

    pub fn types_dir(&self) -> PathBuf {
        self.root.join(&self.layout.types_dir)
    }

    pub fn artifact_path(&self, directory: &str, component: &str) -> PathBuf {
        self.components_root()
            .join(directory)
            .join(format!("{component}.tsx"))
    }

    pub fn config(&self) -> AuditConfig {
        AuditConfig {
            project_root: Some(self.root.clone()),
            ..AuditConfig::default()
        }
    }

    /// Overwrite the mapping source with custom content
    pub fn write_mapping(&self, content: &str) {
        write_file(&self.mapping_path(), content);
    }

    /// Move an artifact file to another category directory
    pub fn move_artifact(&self, component: &str, from: &str, to: &str) {
        let target = self.artifact_path(to, component);
        fs::create_dir_all(target.parent().expect("artifact has a parent"))
            .expect("create target dir");
        fs::rename(self.artifact_path(from, component), target).expect("move artifact");
    }

    pub fn mapping_source(&self) -> String {
        let mut out = String::from("import React from 'react';\n");
        for s in &self.services {
            writeln!(
                out,
                "import {{ {} }} from '../components/Phase2/ServiceRequirements/{}/{}';",
                s.component, s.directory, s.component
            )
            .unwrap();
        }

        out.push_str("\nexport const SERVICE_COMPONENT_MAP: Record<string, React.FC> = {\n");
        for s in &self.services {
            writeln!(out, "  '{}': {},", s.id, s.component).unwrap();
        }
        out.push_str("};\n\nexport const SERVICE_CATEGORY_MAP: Record<string, string> = {\n");
        for s in &self.services {
            writeln!(out, "  '{}': '{}',", s.id, s.category).unwrap();
        }
        out.push_str("};\n");
        out
    }

    fn write_all(&self) {
        write_file(&self.mapping_path(), &self.mapping_source());

        for s in &self.services {
            write_file(
                &self.artifact_path(&s.directory, &s.component),
                &format!("export const {} = () => null;\n", s.component),
            );
        }

        for category in &CatalogExpectations::default().categories {
            let mut content = String::new();
            for s in self
                .services
                .iter()
                .filter(|s| s.interface_file == category.interface_file)
            {
                writeln!(
                    content,
                    "export interface {}Requirements {{\n  enabled: boolean;\n}}\n",
                    s.component
                )
                .unwrap();
            }
            write_file(&self.types_dir().join(&category.interface_file), &content);
        }
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write fixture file");
}
