use thiserror::Error;
use tracing::{error, info, warn};

use crate::parser::types::base_type;
use crate::schema::Registry;
use crate::settings::{APPROVED_NO_SUBTYPES, CORE_TYPES};

/// A referential problem in the extracted schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Defect {
    #[error("{0} has no link")]
    MissingHref(String),

    #[error("type {0} has no fields or subtypes, and is not approved")]
    NoFieldsOrSubtypes(String),

    #[error("type {parent} uses invalid subtype {subtype}")]
    InvalidSubtype { parent: String, subtype: String },

    #[error("unknown field type {ty} in {owner}.{field}")]
    UnknownFieldType {
        owner: String,
        field: String,
        ty: String,
    },

    #[error("{0} has no return types")]
    MissingReturns(String),

    #[error("unknown return type {ty} in {method}")]
    UnknownReturnType { method: String, ty: String },
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub defects: Vec<Defect>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.defects.is_empty()
    }

    fn defect(&mut self, defect: Defect) {
        error!("{}", defect);
        self.defects.push(defect);
    }

    fn warning(&mut self, msg: String) {
        warn!("{}", msg);
        self.warnings.push(msg);
    }
}

/// Check every type, then every method, collecting all defects.
///
/// Also fills in `subtype_of` back-references, so this runs once on a
/// freshly extracted registry.
pub fn validate(registry: &mut Registry) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_types(registry, &mut report);
    check_methods(registry, &mut report);

    info!(
        types = registry.types.len(),
        methods = registry.methods.len(),
        defects = report.defects.len(),
        warnings = report.warnings.len(),
        "Validation finished"
    );
    report
}

fn check_types(registry: &mut Registry, report: &mut ValidationReport) {
    // (subtype, parent) pairs, applied after the scan
    let mut parents: Vec<(String, String)> = Vec::new();

    for (name, t) in &registry.types {
        if !t.entity.has_href() {
            report.defect(Defect::MissingHref(name.clone()));
            continue;
        }

        let fields = t.entity.fields();
        if fields.is_empty() {
            let subtypes = t.subtypes.as_deref().unwrap_or_default();
            if subtypes.is_empty() && !APPROVED_NO_SUBTYPES.contains(&name.as_str()) {
                report.defect(Defect::NoFieldsOrSubtypes(name.clone()));
                continue;
            }

            for st in subtypes {
                if registry.types.contains_key(st) {
                    parents.push((st.clone(), name.clone()));
                } else {
                    report.defect(Defect::InvalidSubtype {
                        parent: name.clone(),
                        subtype: st.clone(),
                    });
                }
            }
        }

        for field in fields {
            for ty in &field.types {
                if !resolves(registry, ty) {
                    report.defect(Defect::UnknownFieldType {
                        owner: name.clone(),
                        field: field.name.clone(),
                        ty: base_type(ty).to_string(),
                    });
                }
            }
        }
    }

    for (subtype, parent) in parents {
        if let Some(t) = registry.types.get_mut(&subtype) {
            t.subtype_of.push(parent);
        }
    }
}

fn check_methods(registry: &Registry, report: &mut ValidationReport) {
    for (name, m) in &registry.methods {
        if !m.entity.has_href() {
            report.defect(Defect::MissingHref(name.clone()));
            continue;
        }

        if m.returns.is_empty() {
            report.defect(Defect::MissingReturns(name.clone()));
            continue;
        }

        if m.returns.len() > 1 {
            report.warning(format!("{} has multiple return types: {:?}", name, m.returns));
        }

        for field in m.entity.fields() {
            for ty in &field.types {
                if !resolves(registry, ty) {
                    report.defect(Defect::UnknownFieldType {
                        owner: name.clone(),
                        field: field.name.clone(),
                        ty: base_type(ty).to_string(),
                    });
                }
            }
        }

        for ret in &m.returns {
            if !resolves(registry, ret) {
                report.defect(Defect::UnknownReturnType {
                    method: name.clone(),
                    ty: base_type(ret).to_string(),
                });
            }
        }
    }
}

/// A reference is valid if, minus any array nesting, it names a core type
/// or a documented one.
fn resolves(registry: &Registry, ty: &str) -> bool {
    let base = base_type(ty);
    CORE_TYPES.contains(&base) || registry.types.contains_key(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Category, Field};
    use pretty_assertions::assert_eq;

    fn field(name: &str, types: &[&str]) -> Field {
        Field {
            name: name.into(),
            types: types.iter().map(|s| s.to_string()).collect(),
            required: true,
            description: String::new(),
        }
    }

    fn with_type(reg: &mut Registry, name: &str, fields: Vec<Field>) {
        reg.open(Category::Types, name, Some(format!("https://x/#{}", name.to_lowercase())));
        if !fields.is_empty() {
            reg.entity_mut(Category::Types, name).unwrap().fields = Some(fields);
        }
    }

    fn with_method(reg: &mut Registry, name: &str, returns: &[&str]) {
        reg.open(Category::Methods, name, Some(format!("https://x/#{}", name.to_lowercase())));
        reg.methods[name].returns = returns.iter().map(|s| s.to_string()).collect();
    }

    #[test]
    fn clean_registry_passes() {
        let mut reg = Registry::default();
        with_type(&mut reg, "User", vec![field("id", &["Integer"])]);
        with_type(&mut reg, "Chat", vec![field("members", &["Array of Array of User"])]);
        with_method(&mut reg, "getMe", &["User"]);
        with_method(&mut reg, "getChats", &["Array of Chat"]);

        let report = validate(&mut reg);
        assert!(report.is_ok(), "{:?}", report.defects);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn subtype_back_reference() {
        let mut reg = Registry::default();
        with_type(&mut reg, "A", vec![]);
        reg.types["A"].subtypes = Some(vec!["B".into()]);
        with_type(&mut reg, "B", vec![field("x", &["String"])]);

        let report = validate(&mut reg);
        assert!(report.is_ok());
        assert_eq!(reg.types["B"].subtype_of, vec!["A"]);
        assert!(reg.types["A"].subtype_of.is_empty());
    }

    #[test]
    fn one_back_reference_per_parent() {
        let mut reg = Registry::default();
        with_type(&mut reg, "P1", vec![]);
        reg.types["P1"].subtypes = Some(vec!["C".into()]);
        with_type(&mut reg, "P2", vec![]);
        reg.types["P2"].subtypes = Some(vec!["C".into()]);
        with_type(&mut reg, "C", vec![field("x", &["String"])]);

        validate(&mut reg);
        assert_eq!(reg.types["C"].subtype_of, vec!["P1", "P2"]);
    }

    #[test]
    fn every_defect_is_reported() {
        let mut reg = Registry::default();
        reg.open(Category::Types, "NoLink", None);
        with_type(&mut reg, "Empty", vec![]);
        with_type(&mut reg, "Parent", vec![]);
        reg.types["Parent"].subtypes = Some(vec!["Ghost".into()]);
        with_type(&mut reg, "Holder", vec![field("f", &["Array of Nope"])]);
        with_method(&mut reg, "noReturn", &[]);
        with_method(&mut reg, "badReturn", &["Array of Missing"]);
        reg.open(Category::Methods, "noLink", None);

        let report = validate(&mut reg);
        assert_eq!(
            report.defects,
            vec![
                Defect::MissingHref("NoLink".into()),
                Defect::NoFieldsOrSubtypes("Empty".into()),
                Defect::InvalidSubtype {
                    parent: "Parent".into(),
                    subtype: "Ghost".into()
                },
                Defect::UnknownFieldType {
                    owner: "Holder".into(),
                    field: "f".into(),
                    ty: "Nope".into()
                },
                Defect::MissingReturns("noReturn".into()),
                Defect::UnknownReturnType {
                    method: "badReturn".into(),
                    ty: "Missing".into()
                },
                Defect::MissingHref("noLink".into()),
            ]
        );
    }

    #[test]
    fn every_union_member_is_checked() {
        let mut reg = Registry::default();
        with_type(&mut reg, "User", vec![field("who", &["Unknown", "User"])]);

        let report = validate(&mut reg);
        assert_eq!(
            report.defects,
            vec![Defect::UnknownFieldType {
                owner: "User".into(),
                field: "who".into(),
                ty: "Unknown".into()
            }]
        );
    }

    #[test]
    fn method_params_are_checked() {
        let mut reg = Registry::default();
        with_method(&mut reg, "send", &["Boolean"]);
        reg.entity_mut(Category::Methods, "send").unwrap().fields =
            Some(vec![field("chat_id", &["Integer", "Strin"])]);

        let report = validate(&mut reg);
        assert_eq!(report.defects.len(), 1);
        assert_eq!(report.defects[0].to_string(), "unknown field type Strin in send.chat_id");
    }

    #[test]
    fn exempt_types_pass() {
        let mut reg = Registry::default();
        for name in APPROVED_NO_SUBTYPES {
            with_type(&mut reg, name, vec![]);
        }
        assert!(validate(&mut reg).is_ok());
    }

    #[test]
    fn multiple_returns_warn_only() {
        let mut reg = Registry::default();
        with_type(&mut reg, "Message", vec![field("id", &["Integer"])]);
        with_method(&mut reg, "edit", &["Message", "Boolean"]);

        let report = validate(&mut reg);
        assert!(report.is_ok());
        assert_eq!(report.warnings.len(), 1);
    }
}
