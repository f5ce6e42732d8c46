//! Field extraction within a single ad container.
//!
//! Every field carries its own priority-ordered rule table. Rules are plain
//! data: a CSS sub-query plus a read method. The first rule that yields
//! non-empty trimmed text wins; when none does, the field's sentinel default
//! is substituted so records never carry missing values.

use scraper::{ElementRef, Selector};
use url::Url;

/// Sentinel for a container without recognizable title markup.
pub const NO_TITLE: &str = "Без названия";
/// Sentinel for a container without price markup.
pub const NO_PRICE: &str = "Цена не указана";
/// Sentinel for missing location or date markup.
pub const NOT_SPECIFIED: &str = "Не указано";
/// Sentinel for a title anchor without an href.
pub const NO_LINK: &str = "Без ссылки";

/// How to read a value from a matched node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMethod {
    /// Read a named attribute; the rule fails when it is absent or empty.
    Attr(&'static str),
    /// Read the node's rendered text.
    Text,
    /// Read a named attribute, falling back to the node's text.
    AttrOrText(&'static str),
}

/// One prioritized lookup rule: a sub-query within the container plus a way
/// to read the matched node.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub query: &'static str,
    pub method: ReadMethod,
}

/// Title rules across markup generations. The matched anchor also supplies
/// the ad link (see [`extract_link`]).
pub const TITLE_RULES: &[FieldRule] = &[
    FieldRule {
        query: "a[data-marker=\"item-title\"]",
        method: ReadMethod::AttrOrText("title"),
    },
    FieldRule {
        query: "h3[itemprop=\"name\"]",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "a.iva-item-title",
        method: ReadMethod::AttrOrText("title"),
    },
    FieldRule {
        query: "h3.title",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "a.link-link",
        method: ReadMethod::AttrOrText("title"),
    },
];

/// Price rules. The meta variant carries the numeric price in its `content`
/// attribute and has no visible text.
pub const PRICE_RULES: &[FieldRule] = &[
    FieldRule {
        query: "meta[itemprop=\"price\"]",
        method: ReadMethod::Attr("content"),
    },
    FieldRule {
        query: "span[data-marker=\"item-price\"]",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "div.iva-item-price",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "span.price",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "p.price",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "div[data-marker=\"item-price\"]",
        method: ReadMethod::Text,
    },
];

/// Location rules, used only in location-extraction mode.
pub const LOCATION_RULES: &[FieldRule] = &[
    FieldRule {
        query: "div[data-marker=\"item-address\"]",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "div.geo-address",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "span.item-address",
        method: ReadMethod::Text,
    },
];

/// Listing date rules, used only in location-extraction mode.
pub const DATE_RULES: &[FieldRule] = &[
    FieldRule {
        query: "div[data-marker=\"item-date\"]",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "div.iva-item-dateInfoStep",
        method: ReadMethod::Text,
    },
    FieldRule {
        query: "div.date",
        method: ReadMethod::Text,
    },
];

/// Extractable ad fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Price,
    Location,
    Date,
}

impl Field {
    /// Rule table for this field.
    fn rules(self) -> &'static [FieldRule] {
        match self {
            Field::Title => TITLE_RULES,
            Field::Price => PRICE_RULES,
            Field::Location => LOCATION_RULES,
            Field::Date => DATE_RULES,
        }
    }

    /// Sentinel substituted when no rule yields a value.
    pub fn default_value(self) -> &'static str {
        match self {
            Field::Title => NO_TITLE,
            Field::Price => NO_PRICE,
            Field::Location | Field::Date => NOT_SPECIFIED,
        }
    }
}

/// Extract a field from an ad container. Total: always returns a value,
/// falling back to the field's sentinel default.
pub fn extract(container: &ElementRef<'_>, field: Field) -> String {
    apply_rules(container, field.rules())
        .unwrap_or_else(|| field.default_value().to_string())
}

/// Try rules in priority order; first non-empty trimmed result wins.
fn apply_rules(container: &ElementRef<'_>, rules: &[FieldRule]) -> Option<String> {
    for rule in rules {
        let selector = match Selector::parse(rule.query) {
            Ok(s) => s,
            Err(_) => continue,
        };

        let element = match container.select(&selector).next() {
            Some(e) => e,
            None => continue,
        };

        let value = match rule.method {
            ReadMethod::Attr(name) => element.value().attr(name).unwrap_or("").to_string(),
            ReadMethod::Text => element.text().collect::<String>(),
            ReadMethod::AttrOrText(name) => {
                let attr = element.value().attr(name).unwrap_or("");
                if attr.trim().is_empty() {
                    element.text().collect::<String>()
                } else {
                    attr.to_string()
                }
            }
        };

        let value = value.trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    None
}

/// Extract the ad link from the title anchor, resolved against the site's
/// base origin. Relative hrefs become absolute URLs; a container without any
/// href gets the [`NO_LINK`] sentinel rather than an absent field.
pub fn extract_link(container: &ElementRef<'_>, base_url: &str) -> String {
    for rule in TITLE_RULES {
        let selector = match Selector::parse(rule.query) {
            Ok(s) => s,
            Err(_) => continue,
        };

        let element = match container.select(&selector).next() {
            Some(e) => e,
            None => continue,
        };

        let href = match element.value().attr("href") {
            Some(h) if !h.trim().is_empty() => h,
            _ => continue,
        };

        if let Ok(base) = Url::parse(base_url) {
            if let Ok(resolved) = base.join(href) {
                return resolved.to_string();
            }
        }
    }

    NO_LINK.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first_container(html: &str) -> (Html, Selector) {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse("div[data-marker=\"item\"]").unwrap();
        (document, selector)
    }

    #[test]
    fn test_title_from_attribute() {
        let (document, selector) = first_container(
            r#"<div data-marker="item">
                <a data-marker="item-title" title="Ноутбук ASUS" href="/items/1">link text</a>
            </div>"#,
        );
        let container = document.select(&selector).next().unwrap();
        assert_eq!(extract(&container, Field::Title), "Ноутбук ASUS");
    }

    #[test]
    fn test_title_falls_back_to_anchor_text() {
        let (document, selector) = first_container(
            r#"<div data-marker="item">
                <a data-marker="item-title" href="/items/1">  Велосипед  </a>
            </div>"#,
        );
        let container = document.select(&selector).next().unwrap();
        assert_eq!(extract(&container, Field::Title), "Велосипед");
    }

    #[test]
    fn test_title_sentinel_when_no_rule_matches() {
        let (document, selector) =
            first_container(r#"<div data-marker="item"><span>no title here</span></div>"#);
        let container = document.select(&selector).next().unwrap();
        assert_eq!(extract(&container, Field::Title), NO_TITLE);
        // Deterministic: same input, same sentinel
        assert_eq!(extract(&container, Field::Title), NO_TITLE);
    }

    #[test]
    fn test_title_skips_empty_match() {
        // The legacy h3 matches but is empty; the lower-priority rule with
        // actual content wins.
        let (document, selector) = first_container(
            r#"<div data-marker="item">
                <h3 itemprop="name">   </h3>
                <h3 class="title">Гараж</h3>
            </div>"#,
        );
        let container = document.select(&selector).next().unwrap();
        assert_eq!(extract(&container, Field::Title), "Гараж");
    }

    #[test]
    fn test_price_from_meta_content() {
        // Meta-style price node: numeric content attribute, no visible text.
        let (document, selector) = first_container(
            r#"<div data-marker="item"><meta itemprop="price" content="15000"></div>"#,
        );
        let container = document.select(&selector).next().unwrap();
        assert_eq!(extract(&container, Field::Price), "15000");
    }

    #[test]
    fn test_price_meta_preferred_over_visible_text() {
        let (document, selector) = first_container(
            r#"<div data-marker="item">
                <meta itemprop="price" content="15000">
                <span data-marker="item-price">15 000 ₽</span>
            </div>"#,
        );
        let container = document.select(&selector).next().unwrap();
        assert_eq!(extract(&container, Field::Price), "15000");
    }

    #[test]
    fn test_price_sentinel() {
        let (document, selector) = first_container(r#"<div data-marker="item"></div>"#);
        let container = document.select(&selector).next().unwrap();
        assert_eq!(extract(&container, Field::Price), NO_PRICE);
    }

    #[test]
    fn test_location_and_date() {
        let (document, selector) = first_container(
            r#"<div data-marker="item">
                <div data-marker="item-address">Екатеринбург, Уралмаш</div>
                <div data-marker="item-date">2 дня назад</div>
            </div>"#,
        );
        let container = document.select(&selector).next().unwrap();
        assert_eq!(
            extract(&container, Field::Location),
            "Екатеринбург, Уралмаш"
        );
        assert_eq!(extract(&container, Field::Date), "2 дня назад");
    }

    #[test]
    fn test_extract_link_relative() {
        let (document, selector) = first_container(
            r#"<div data-marker="item">
                <a data-marker="item-title" title="t" href="/items/123">t</a>
            </div>"#,
        );
        let container = document.select(&selector).next().unwrap();
        assert_eq!(
            extract_link(&container, "https://example.test"),
            "https://example.test/items/123"
        );
    }

    #[test]
    fn test_extract_link_absolute_passthrough() {
        let (document, selector) = first_container(
            r#"<div data-marker="item">
                <a data-marker="item-title" href="https://other.test/items/9">t</a>
            </div>"#,
        );
        let container = document.select(&selector).next().unwrap();
        assert_eq!(
            extract_link(&container, "https://example.test"),
            "https://other.test/items/9"
        );
    }

    #[test]
    fn test_extract_link_sentinel_without_href() {
        let (document, selector) = first_container(
            r#"<div data-marker="item"><h3 itemprop="name">Шкаф</h3></div>"#,
        );
        let container = document.select(&selector).next().unwrap();
        assert_eq!(extract_link(&container, "https://example.test"), NO_LINK);
    }
}
