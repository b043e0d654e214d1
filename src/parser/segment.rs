use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ElementRef, Selector};
use tracing::{debug, info};

use super::extract::{fields, returns, subtypes};
use super::text::{normalize, resolve_url};
use crate::error::ExtractError;
use crate::schema::{Category, Registry};

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// The entity content is currently routed to, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub current: Option<(Category, String)>,
}

impl Context {
    fn open(category: Category, name: String) -> Self {
        Context {
            current: Some((category, name)),
        }
    }
}

/// Walk the content container's top-level elements in document order.
pub fn segment(content: ElementRef, base: &Url) -> Result<Registry, ExtractError> {
    let mut registry = Registry::default();
    let mut ctx = Context::default();

    for node in content.children().filter_map(ElementRef::wrap) {
        ctx = route(ctx, node, &mut registry, base)?;
    }

    info!(
        types = registry.types.len(),
        methods = registry.methods.len(),
        "Segmented document"
    );
    Ok(registry)
}

/// Apply one top-level node to the registry and return the next context.
pub fn route(
    ctx: Context,
    node: ElementRef,
    registry: &mut Registry,
    base: &Url,
) -> Result<Context, ExtractError> {
    match node.value().name() {
        // h3 starts a new section, hr closes one
        "h3" | "hr" => return Ok(Context::default()),
        "h4" => return Ok(open_entity(node, registry, base)),
        _ => {}
    }

    let Some((category, name)) = ctx.current.clone() else {
        return Ok(ctx);
    };
    let name = name.as_str();

    match node.value().name() {
        "p" => {
            let line = normalize(node, base);
            if let Some(entity) = registry.entity_mut(category, name) {
                entity.description.push(line);
            }
        }
        "table" => {
            let rows = fields::extract(node, name, category, base)?;
            if let Some(entity) = registry.entity_mut(category, name) {
                entity.fields = Some(rows);
            }
        }
        "ul" => {
            let items = subtypes::extract(node, base);
            subtypes::attach(registry, category, name, items);
        }
        other => debug!("Ignoring <{}> under {}", other, name),
    }

    if category == Category::Methods {
        refresh_returns(registry, name);
    }
    Ok(ctx)
}

/// Start a record for an `h4` header, or clear context if it isn't one.
fn open_entity(header: ElementRef, registry: &mut Registry, base: &Url) -> Context {
    let Some(anchor) = header.select(&ANCHOR_SEL).next() else {
        debug!("Header without anchor, skipping");
        return Context::default();
    };

    // Hyphenated anchors belong to prose sections like "Sending files".
    if anchor.value().attr("name").is_some_and(|n| n.contains('-')) {
        return Context::default();
    }

    let name = header.text().collect::<String>().trim().to_string();
    let Some(first) = name.chars().next() else {
        return Context::default();
    };
    let category = if first.is_uppercase() {
        Category::Types
    } else {
        Category::Methods
    };

    // an empty href is a missing one, not a link to the page itself
    let href = anchor
        .value()
        .attr("href")
        .filter(|h| !h.trim().is_empty())
        .map(|h| resolve_url(base, h));
    registry.open(category, &name, href);
    Context::open(category, name)
}

/// Re-derive a method's return types from its whole description.
fn refresh_returns(registry: &mut Registry, name: &str) {
    let Some(method) = registry.methods.get_mut(name) else {
        return;
    };
    if method.entity.description.is_empty() {
        return;
    }
    if let Some(found) = returns::infer(&method.entity.description) {
        method.returns = found;
    }
}
