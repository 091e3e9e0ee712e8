use serde::Serialize;
use utoipa::ToSchema;

/// What a business category sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryKind {
    Product,
    Service,
    Content,
}

impl CategoryKind {
    /// Resolve a category slug. Unknown slugs are treated as services.
    pub fn from_slug(slug: &str) -> Self {
        match slug.trim().to_ascii_lowercase().as_str() {
            "clothing" | "gift-shop" | "carpet-furniture" | "jewelry" | "market-bakery"
            | "decoration" | "food-shopping" | "cake-sweet" | "pickles-sour" => {
                CategoryKind::Product
            }
            "blogger-entertainment" | "food-blogger" | "comedy" | "channel-magazine"
            | "podcast" | "association" | "magazine" | "tv" | "radio" => CategoryKind::Content,
            _ => CategoryKind::Service,
        }
    }

    /// Farsi label used inside prompts
    pub fn label(self) -> &'static str {
        match self {
            CategoryKind::Product => "محصولات",
            CategoryKind::Service => "خدمات",
            CategoryKind::Content => "محتوا",
        }
    }
}
