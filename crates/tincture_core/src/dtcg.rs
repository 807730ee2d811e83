//! DTCG token document ingestion
//!
//! Parses Design Tokens Community Group JSON documents: nested group objects
//! whose leaves carry `$type`/`$value` (or bare `type`/`value`, for sources
//! that predate the community-group spec) tags. Group paths flatten into token
//! ids joined with `-`, and a group-level `$type` is inherited by its leaves.
//!
//! Shape violations do not abort the parse; every offending record lands in
//! the returned report so one pass covers the whole document.

use serde_json::Value;

use crate::error::{TokenError, TokenResult};
use crate::theme::{infer_type, infer_type_from_id};
use crate::token::{DesignToken, TokenType, TokenValue};
use crate::validate::ValidationReport;

/// A parsed DTCG document: accepted tokens plus the shape-violation report
#[derive(Debug, Default)]
pub struct DtcgDocument {
    pub tokens: Vec<DesignToken>,
    pub report: ValidationReport,
}

/// Parse a DTCG JSON document
///
/// `strict` controls the shape policy: in strict mode a leaf missing its type
/// tag is rejected; in lenient mode the type is inferred from the value shape
/// and the omission becomes a warning. A missing value tag rejects in both
/// modes. JSON syntax errors are fatal for the whole document.
pub fn parse_document(src: &str, strict: bool) -> TokenResult<DtcgDocument> {
    let root: Value = serde_json::from_str(src).map_err(|e| TokenError::InvalidFormat {
        id: "<document>".to_string(),
        reason: format!("invalid JSON: {e}"),
    })?;
    let Value::Object(map) = root else {
        return Err(TokenError::InvalidFormat {
            id: "<document>".to_string(),
            reason: "top level must be a JSON object".to_string(),
        });
    };

    let mut doc = DtcgDocument::default();
    let mut path = Vec::new();
    walk_group(&map, &mut path, None, strict, &mut doc);
    tracing::debug!(
        tokens = doc.tokens.len(),
        rejected = doc.report.rejected.len(),
        "parsed DTCG document"
    );
    Ok(doc)
}

fn tag<'a>(obj: &'a serde_json::Map<String, Value>, dollar: &str, bare: &str) -> Option<&'a Value> {
    obj.get(dollar).or_else(|| obj.get(bare))
}

fn is_leaf(obj: &serde_json::Map<String, Value>) -> bool {
    tag(obj, "$value", "value").is_some()
}

fn walk_group(
    group: &serde_json::Map<String, Value>,
    path: &mut Vec<String>,
    inherited_type: Option<TokenType>,
    strict: bool,
    doc: &mut DtcgDocument,
) {
    let group_type = tag(group, "$type", "type")
        .and_then(Value::as_str)
        .and_then(TokenType::from_tag)
        .or(inherited_type);

    for (key, value) in group {
        if key.starts_with('$') || key == "type" || key == "value" || key == "description" {
            continue;
        }
        let Value::Object(obj) = value else {
            path.push(key.clone());
            doc.report.checked += 1;
            doc.report.rejected.push((
                path.join("-"),
                vec![TokenError::InvalidFormat {
                    id: path.join("-"),
                    reason: "expected a group object or a token record".to_string(),
                }],
            ));
            path.pop();
            continue;
        };

        path.push(key.clone());
        if is_leaf(obj) {
            ingest_leaf(obj, &path.join("-"), group_type, strict, doc);
        } else {
            walk_group(obj, path, group_type, strict, doc);
        }
        path.pop();
    }
}

fn ingest_leaf(
    obj: &serde_json::Map<String, Value>,
    id: &str,
    inherited_type: Option<TokenType>,
    strict: bool,
    doc: &mut DtcgDocument,
) {
    doc.report.checked += 1;

    let raw_value = match tag(obj, "$value", "value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        // Composite values (shadow, typography) stay as compact JSON
        Some(other) => other.to_string(),
        None => unreachable!("is_leaf checked the value tag"),
    };
    let value = TokenValue::parse(&raw_value);

    let declared = tag(obj, "$type", "type").and_then(Value::as_str);
    let token_type = match declared {
        Some(tag_str) => match TokenType::from_tag(tag_str) {
            Some(t) => t,
            None => {
                doc.report.rejected.push((
                    id.to_string(),
                    vec![TokenError::InvalidFormat {
                        id: id.to_string(),
                        reason: format!("`{tag_str}` is not a known token type"),
                    }],
                ));
                return;
            }
        },
        None => match inherited_type {
            Some(t) => t,
            None if strict => {
                doc.report.rejected.push((
                    id.to_string(),
                    vec![TokenError::InvalidFormat {
                        id: id.to_string(),
                        reason: "missing $type tag".to_string(),
                    }],
                ));
                return;
            }
            None => {
                let (inferred, assumed) = match &value {
                    TokenValue::Literal(lit) => (infer_type(lit), false),
                    TokenValue::Alias(target) => match infer_type_from_id(target) {
                        Some(t) => (Some(t), false),
                        // The target's prefix tells us nothing; the real type
                        // comes from the resolved target at resolution time.
                        None => (Some(TokenType::Color), true),
                    },
                };
                let Some(t) = inferred else {
                    doc.report.rejected.push((
                        id.to_string(),
                        vec![TokenError::InvalidFormat {
                            id: id.to_string(),
                            reason: format!("missing $type tag and `{raw_value}` has no inferable type"),
                        }],
                    ));
                    return;
                };
                let warning = if assumed {
                    format!("missing $type tag and the alias target has no recognizable category, assumed `{t}`")
                } else {
                    format!("missing $type tag, inferred `{t}`")
                };
                doc.report.warnings.push((id.to_string(), warning));
                t
            }
        },
    };

    let mut token = DesignToken::new(id.to_string(), token_type, &raw_value);
    token.value = value;
    token.description = tag(obj, "$description", "description")
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Some((category, _)) = id.split_once('-') {
        token.category = Some(category.to_string());
    }
    doc.tokens.push(token);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_records() {
        let doc = parse_document(
            r##"{
                "color-primary": { "$type": "color", "$value": "#0066cc", "$description": "brand" },
                "color-accent": { "$type": "color", "$value": "{color-primary}" }
            }"##,
            true,
        )
        .unwrap();
        assert!(doc.report.is_clean());
        assert_eq!(doc.tokens.len(), 2);
        assert_eq!(doc.tokens[0].description.as_deref(), Some("brand"));
        assert!(doc.tokens[1].value.is_alias());
    }

    #[test]
    fn flattens_groups_and_inherits_type() {
        let doc = parse_document(
            r##"{
                "color": {
                    "$type": "color",
                    "primary": { "$value": "#0066cc" },
                    "surface": { "raised": { "$value": "#ffffff" } }
                }
            }"##,
            true,
        )
        .unwrap();
        assert!(doc.report.is_clean());
        let ids: Vec<&str> = doc.tokens.iter().map(|t| t.id.as_str()).collect();
        assert!(ids.contains(&"color-primary"));
        assert!(ids.contains(&"color-surface-raised"));
        assert!(doc.tokens.iter().all(|t| t.token_type == TokenType::Color));
    }

    #[test]
    fn accepts_bare_tags_from_pre_dtcg_sources() {
        let doc = parse_document(
            r##"{ "spacing-md": { "type": "dimension", "value": "16px" } }"##,
            true,
        )
        .unwrap();
        assert!(doc.report.is_clean());
        assert_eq!(doc.tokens[0].token_type, TokenType::Dimension);
    }

    #[test]
    fn tokens_keep_document_order() {
        let doc = parse_document(
            r##"{
                "spacing-md": { "$type": "dimension", "$value": "16px" },
                "color-primary": { "$type": "color", "$value": "#0066cc" },
                "color-accent": { "$type": "color", "$value": "{color-primary}" }
            }"##,
            true,
        )
        .unwrap();
        let ids: Vec<&str> = doc.tokens.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["spacing-md", "color-primary", "color-accent"]);
    }

    #[test]
    fn strict_rejects_missing_type_tag() {
        let doc =
            parse_document(r##"{ "spacing-md": { "$value": "16px" } }"##, true).unwrap();
        assert_eq!(doc.tokens.len(), 0);
        assert_eq!(doc.report.rejected.len(), 1);
    }

    #[test]
    fn lenient_infers_missing_type_tag_with_warning() {
        let doc =
            parse_document(r##"{ "spacing-md": { "$value": "16px" } }"##, false).unwrap();
        assert_eq!(doc.tokens.len(), 1);
        assert_eq!(doc.tokens[0].token_type, TokenType::Dimension);
        assert_eq!(doc.report.warnings.len(), 1);
    }

    #[test]
    fn lenient_flags_unrecognizable_alias_targets() {
        let doc = parse_document(
            r##"{ "mystery-ref": { "$value": "{unknown-thing}" } }"##,
            false,
        )
        .unwrap();
        assert_eq!(doc.tokens.len(), 1);
        assert_eq!(doc.tokens[0].token_type, TokenType::Color);
        assert_eq!(doc.report.warnings.len(), 1);
        assert!(doc.report.warnings[0].1.contains("no recognizable category"));
    }

    #[test]
    fn bad_records_do_not_abort_the_pass() {
        let doc = parse_document(
            r##"{
                "color-good": { "$type": "color", "$value": "#fff" },
                "color-untyped": { "$value": "???" },
                "color-late": { "$type": "color", "$value": "#000" }
            }"##,
            true,
        )
        .unwrap();
        assert_eq!(doc.tokens.len(), 2);
        assert_eq!(doc.report.rejected.len(), 1);
    }
}
