use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ElementRef, Selector};
use tracing::debug;

use crate::parser::text::normalize;
use crate::schema::{Category, Registry};
use crate::settings::NO_SUBTYPE_LISTS;

static ITEM_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());

/// Normalized text of every list item, in order.
pub fn extract(list: ElementRef, base: &Url) -> Vec<String> {
    list.select(&ITEM_SEL).map(|li| normalize(li, base)).collect()
}

/// Record list items on the open entity.
///
/// On a type the items name its subtypes. Either way they are appended to
/// the description as bullets.
pub fn attach(registry: &mut Registry, category: Category, name: &str, items: Vec<String>) {
    if NO_SUBTYPE_LISTS.contains(&name) {
        debug!("Skipping list on {}", name);
        return;
    }

    let bullets = items.iter().map(|s| format!("- {}", s));
    match category {
        Category::Types => {
            if let Some(t) = registry.types.get_mut(name) {
                t.entity.description.extend(bullets);
                t.subtypes = Some(items);
            }
        }
        Category::Methods => {
            if let Some(m) = registry.methods.get_mut(name) {
                m.entity.description.extend(bullets);
            }
        }
    }
}
