/// One company in a catalog. Symbols follow the quote provider's US-listing
/// convention and are unique across both catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyEntry {
    pub symbol: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub title: &'static str,
    pub entries: &'static [CompanyEntry],
}

const MAGNIFICENT_SEVEN: &[CompanyEntry] = &[
    CompanyEntry { symbol: "AAPL", name: "Apple" },
    CompanyEntry { symbol: "MSFT", name: "Microsoft" },
    CompanyEntry { symbol: "GOOGL", name: "Alphabet" },
    CompanyEntry { symbol: "AMZN", name: "Amazon" },
    CompanyEntry { symbol: "NVDA", name: "NVIDIA" },
    CompanyEntry { symbol: "TSLA", name: "Tesla" },
    CompanyEntry { symbol: "META", name: "Meta Platforms" },
];

const BLUE_CHIP_BELLWETHERS: &[CompanyEntry] = &[
    CompanyEntry { symbol: "JPM", name: "JPMorgan Chase" },
    CompanyEntry { symbol: "V", name: "Visa" },
    CompanyEntry { symbol: "JNJ", name: "Johnson & Johnson" },
    CompanyEntry { symbol: "UNH", name: "UnitedHealth Group" },
    CompanyEntry { symbol: "XOM", name: "Exxon Mobil" },
    CompanyEntry { symbol: "PG", name: "Procter & Gamble" },
    CompanyEntry { symbol: "KO", name: "Coca-Cola" },
    CompanyEntry { symbol: "WMT", name: "Walmart" },
];

/// The two catalogs analyzed per run, in presentation order.
pub fn catalogs() -> [Catalog; 2] {
    [
        Catalog {
            title: "Magnificent Seven Intrinsic Value Analysis (Simplified DCF)",
            entries: MAGNIFICENT_SEVEN,
        },
        Catalog {
            title: "Blue-Chip Bellwethers Intrinsic Value Analysis (Simplified DCF)",
            entries: BLUE_CHIP_BELLWETHERS,
        },
    ]
}

/// Looks a symbol up across both catalogs.
pub fn find_entry(symbol: &str) -> Option<CompanyEntry> {
    catalogs()
        .iter()
        .flat_map(|c| c.entries.iter())
        .find(|e| e.symbol == symbol)
        .copied()
}
