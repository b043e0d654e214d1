use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ElementRef, Selector};

use crate::error::ExtractError;
use crate::parser::text::normalize;
use crate::parser::types::parse_type;
use crate::schema::{Category, Field};

static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tbody tr").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

const OPTIONAL_PREFIX: &str = "Optional. ";

/// One field per table body row.
///
/// Types use `name | type | description` and flag optional fields in prose;
/// methods use `name | type | required | description`. Any other width is
/// a layout we don't understand and aborts extraction.
pub fn extract(
    table: ElementRef,
    entity: &str,
    category: Category,
    base: &Url,
) -> Result<Vec<Field>, ExtractError> {
    let expected = match category {
        Category::Types => 3,
        Category::Methods => 4,
    };

    let mut fields = Vec::new();
    for row in table.select(&ROW_SEL) {
        let cells: Vec<ElementRef> = row.select(&CELL_SEL).collect();
        if cells.len() != expected {
            return Err(ExtractError::UnexpectedTableShape {
                entity: entity.to_string(),
                category,
                expected,
                cells: cells.iter().map(|c| cell_text(*c)).collect(),
            });
        }

        let field = match category {
            Category::Types => {
                let description = normalize(cells[2], base);
                Field {
                    name: cell_text(cells[0]),
                    types: parse_type(&cell_text(cells[1])),
                    required: !description.starts_with(OPTIONAL_PREFIX),
                    description,
                }
            }
            Category::Methods => Field {
                name: cell_text(cells[0]),
                types: parse_type(&cell_text(cells[1])),
                required: cell_text(cells[2]) == "Yes",
                description: normalize(cells[3], base),
            },
        };
        fields.push(field);
    }

    Ok(fields)
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::Html;

    fn api() -> Url {
        Url::parse("https://core.telegram.org/bots/api").unwrap()
    }

    fn run(html: &str, category: Category) -> Result<Vec<Field>, ExtractError> {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse("table").unwrap();
        let table = doc.select(&sel).next().unwrap();
        extract(table, "Thing", category, &api())
    }

    #[test]
    fn type_rows() {
        let fields = run(
            "<table><thead><tr><th>Field</th><th>Type</th><th>Description</th></tr></thead>\
             <tbody>\
             <tr><td>id</td><td>Integer</td><td>Unique identifier</td></tr>\
             <tr><td>photo</td><td>Array of PhotoSize</td><td><em>Optional</em>. Photo sizes</td></tr>\
             </tbody></table>",
            Category::Types,
        )
        .unwrap();

        assert_eq!(
            fields,
            vec![
                Field {
                    name: "id".into(),
                    types: vec!["Integer".into()],
                    required: true,
                    description: "Unique identifier".into(),
                },
                Field {
                    name: "photo".into(),
                    types: vec!["Array of PhotoSize".into()],
                    required: false,
                    description: "Optional. Photo sizes".into(),
                },
            ]
        );
    }

    #[test]
    fn method_rows_use_required_column() {
        let fields = run(
            "<table><tbody>\
             <tr><td>chat_id</td><td>Integer or String</td><td>Yes</td><td>Target chat</td></tr>\
             <tr><td>silent</td><td>Boolean</td><td>Optional</td><td>Mute it</td></tr>\
             </tbody></table>",
            Category::Methods,
        )
        .unwrap();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].types, vec!["Integer", "String"]);
        assert!(fields[0].required);
        assert!(!fields[1].required);
        assert_eq!(fields[1].description, "Mute it");
    }

    #[test]
    fn wrong_width_is_fatal() {
        let err = run(
            "<table><tbody><tr><td>a</td><td>String</td><td>desc</td></tr></tbody></table>",
            Category::Methods,
        )
        .unwrap_err();

        match err {
            ExtractError::UnexpectedTableShape {
                entity,
                category,
                expected,
                cells,
            } => {
                assert_eq!(entity, "Thing");
                assert_eq!(category, Category::Methods);
                assert_eq!(expected, 4);
                assert_eq!(cells, vec!["a", "String", "desc"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_body_gives_no_fields() {
        let fields = run(
            "<table><thead><tr><th>Field</th></tr></thead></table>",
            Category::Types,
        )
        .unwrap();
        assert!(fields.is_empty());
    }
}
