use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::models::{Priority, Task};

/// A task blueprint inside a category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TemplateTask {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
}

/// A named group of templates, e.g. "Frontend".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub tasks: Vec<TemplateTask>,
}

/// Ordered list of categories available to the add dialog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

fn tmpl(name: &str, description: &str, priority: Priority) -> TemplateTask {
    TemplateTask {
        name: name.to_string(),
        description: description.to_string(),
        priority,
    }
}

impl Catalog {
    /// Categories shipped with devlist.
    pub fn builtin() -> Catalog {
        use Priority::*;
        Catalog {
            categories: vec![
                Category {
                    name: "Designing".into(),
                    tasks: vec![
                        tmpl("Create Wireframes", "Design page wireframes", High),
                        tmpl("Choose Color Scheme", "Pick colors for UI/UX", Medium),
                        tmpl("Design Mockups", "Create high-fidelity mockups", High),
                    ],
                },
                Category {
                    name: "Frontend".into(),
                    tasks: vec![
                        tmpl("Build Homepage", "Create responsive homepage", High),
                        tmpl("Setup CSS Grid", "Use CSS Grid for layout design", Medium),
                        tmpl("Add JS Slider", "Implement image slider", High),
                        tmpl("Responsive Navbar", "Navbar collapses on mobile", Low),
                        tmpl("SEO Optimization", "Optimize meta tags", Medium),
                    ],
                },
                Category {
                    name: "Backend".into(),
                    tasks: vec![
                        tmpl("Setup Database", "Create MySQL/PostgreSQL DB", High),
                        tmpl("API Endpoints", "Create REST API endpoints", High),
                        tmpl("User Authentication", "Login/register system", Medium),
                    ],
                },
            ],
        }
    }

    /// Looks a category up by name, ignoring case.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Adds every template of `category` to the engine, in catalog order.
    pub fn add_category(&self, engine: &mut Engine, category: &str) -> Result<Vec<Task>> {
        let cat = self
            .category(category)
            .ok_or_else(|| Error::UnknownCategory(category.to_string()))?;
        Ok(cat
            .tasks
            .iter()
            .map(|t| engine.add_task(t.name.clone(), t.description.clone(), t.priority))
            .collect())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

/// Returns the path to the catalog file (`templates.json`).
///
/// The path is determined in the following order:
/// 1. `DEVLIST_TEMPLATES` environment variable.
/// 2. `~/.config/devlist/templates.json` (on Linux).
/// 3. `./templates.json` (fallback).
pub fn templates_path() -> PathBuf {
    std::env::var("DEVLIST_TEMPLATES")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("devlist");
            p.push("templates.json");
            p
        })
}

/// Reads a catalog file. A missing file yields the built-in catalog.
pub fn load_templates_from(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        debug!(path = %path.display(), "no catalog file, using built-ins");
        return Ok(Catalog::builtin());
    }
    let mut f = OpenOptions::new().read(true).open(path)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    Ok(serde_json::from_str(&s)?)
}

/// Loads the configured catalog, falling back to built-ins if it cannot be read.
pub fn load_templates() -> Catalog {
    let path = templates_path();
    load_templates_from(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable catalog");
        Catalog::builtin()
    })
}

/// Writes the catalog as pretty JSON, creating parent directories.
pub fn save_templates_to(path: &Path, catalog: &Catalog) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let s = serde_json::to_string_pretty(catalog)?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
