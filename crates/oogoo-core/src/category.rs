/// Canonical origin of the marketplace. Listing links scraped from cards are
/// made absolute against this, and detail navigation refuses URLs outside it.
pub const SITE_ORIGIN: &str = "https://oogoocar.com";

/// A scraped listing category. Each category is an independent walk over its
/// own paginated listing URL; no ordering is guaranteed across categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Used,
    Certified,
}

impl Category {
    /// All categories the pipeline drives, in launch order.
    pub const ALL: &'static [Category] = &[Category::Used, Category::Certified];

    /// Listing URL for one page of this category (pages are 1-based).
    #[must_use]
    pub fn listing_url(self, page: u32) -> String {
        match self {
            Category::Used => format!(
                "{SITE_ORIGIN}/ar/explore/used/all/all/all/all/list/0/basic?page={page}"
            ),
            Category::Certified => format!(
                "{SITE_ORIGIN}/ar/explore/featured/all/all/certified/all/list/0/basic?page={page}"
            ),
        }
    }

    /// Label used for export file names and log fields.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Used => "Used",
            Category::Certified => "Certified",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
