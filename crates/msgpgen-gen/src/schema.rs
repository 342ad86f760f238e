// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML schema describing the types to generate.
//!
//! ```yaml
//! directives:
//!   - "//msgp:tuple Point"
//! types:
//!   - name: Point
//!     type:
//!       struct:
//!         - { name: x, type: f64 }
//!         - { name: y, type: f64 }
//!   - name: Path
//!     doc: "//msgp:allocbound Path 1024"
//!     type: { slice: Point }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::config::TypeSet;
use crate::directives::yield_directives;
use crate::elem::{Elem, StructField};
use crate::{GenError, GenResult};

/// Parsed schema file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub directives: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// Doc comment; `//msgp:` lines in it are directives.
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

/// Shape of a type. A bare string names a Rust type.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Base(String),
    Pointer {
        pointer: Box<TypeExpr>,
    },
    Slice {
        slice: Box<TypeExpr>,
    },
    Array {
        array: ArrayDecl,
    },
    /// String-keyed map; the expression is the value type.
    Map {
        map: Box<TypeExpr>,
    },
    Struct {
        #[serde(rename = "struct")]
        fields: Vec<FieldDecl>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrayDecl {
    pub len: ArrayLen,
    pub elem: Box<TypeExpr>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArrayLen {
    Count(usize),
    Named(String),
}

impl ArrayLen {
    fn render(&self) -> String {
        match self {
            ArrayLen::Count(n) => n.to_string(),
            ArrayLen::Named(name) => name.clone(),
        }
    }
}

fn default_exported() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    /// Wire key; defaults to the field name.
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default = "default_exported")]
    pub exported: bool,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

impl Schema {
    pub fn from_yaml(text: &str) -> GenResult<Self> {
        let schema: Self = serde_yaml::from_str(text)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> GenResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> GenResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for decl in &self.types {
            if decl.name.trim().is_empty() {
                return Err(GenError::Schema("type with an empty name".into()));
            }
            if !seen.insert(decl.name.as_str()) {
                return Err(GenError::Schema(format!(
                    "type {} is declared twice",
                    decl.name
                )));
            }
        }
        Ok(())
    }

    /// Every directive: the top-level list, then those in type docs.
    pub fn directive_lines(&self) -> Vec<String> {
        let mut lines = self.directives.clone();
        for decl in &self.types {
            if let Some(doc) = &decl.doc {
                lines.extend(yield_directives(doc).into_iter().map(str::to_string));
            }
        }
        lines
    }

    /// Lower every declaration into a named type graph.
    pub fn type_set(&self) -> GenResult<TypeSet> {
        let mut set = TypeSet::new();
        for decl in &self.types {
            let e = lower(&decl.ty, &decl.name, true)?;
            set.insert(e.named(decl.name.clone()));
        }
        Ok(set)
    }
}

fn lower(expr: &TypeExpr, owner: &str, top: bool) -> GenResult<Elem> {
    let e = match expr {
        TypeExpr::Base(name) => Elem::base(name.trim()),
        TypeExpr::Pointer { pointer } => Elem::ptr(lower(pointer, owner, false)?),
        TypeExpr::Slice { slice } => Elem::slice(lower(slice, owner, false)?),
        TypeExpr::Array { array } => {
            Elem::array(array.len.render(), lower(&array.elem, owner, false)?)
        }
        TypeExpr::Map { map } => Elem::map(lower(map, owner, false)?),
        TypeExpr::Struct { fields } => {
            if !top {
                return Err(GenError::Schema(format!(
                    "{owner}: inline struct must be declared as a named type"
                )));
            }
            let mut lowered = Vec::with_capacity(fields.len());
            for f in fields {
                let mut field = StructField::new(f.name.clone(), lower(&f.ty, owner, false)?);
                if let Some(tag) = &f.tag {
                    field = field.with_tag(tag.clone());
                }
                if !f.exported {
                    field = field.private();
                }
                lowered.push(field);
            }
            Elem::structure(lowered)
        }
    };
    Ok(e)
}
