/// Constants shared across the extraction pipeline.
/// Brand tables are ordered: earlier entries win on overlapping matches.

/// Inclusive bounds for an accepted year of manufacture or purchase.
pub const YEAR_MIN: i32 = 1950;
pub const YEAR_MAX: i32 = 2030;

/// Label introducing the primary year source on product pages.
pub const DATE_OF_PURCHASE_LABEL: &str = "Date of Purchase";

/// Multi-word brands as (pattern, canonical name). Patterns are regex
/// fragments matched case-insensitively at the start of a phrase.
pub const MULTI_WORD_BRANDS: &[(&str, &str)] = &[
    (r"Audemars\s+Piguet", "Audemars Piguet"),
    (r"Patek\s+Philippe", "Patek Philippe"),
    (r"Vacheron\s+Constantin", "Vacheron Constantin"),
    (r"A\.?\s*Lange\s*(?:&|and)\s*S(?:ö|o|oe)hne", "A. Lange & Söhne"),
    (r"Franck\s+Muller", "Franck Muller"),
    (r"Bell\s*(?:&|and)\s*Ross", "Bell & Ross"),
    (r"Tag\s+Heuer", "Tag Heuer"),
    (r"Jaeger[\s-]+LeCoultre", "Jaeger-LeCoultre"),
    (r"Grand\s+Seiko", "Grand Seiko"),
    (r"Richard\s+Mille", "Richard Mille"),
    (r"Ulysse\s+Nardin", "Ulysse Nardin"),
    (r"Girard[\s-]+Perregaux", "Girard-Perregaux"),
    (r"H\.?\s*Moser\s*(?:&|and)\s*Cie", "H. Moser & Cie"),
];

/// Single-word brands, output in uppercase.
pub const SINGLE_WORD_BRANDS: &[&str] = &[
    "Omega",
    "Rolex",
    "Tudor",
    "Cartier",
    "Hublot",
    "Breitling",
    "Panerai",
    "IWC",
    "Zenith",
    "Montblanc",
    "Longines",
    "Tissot",
    "Seiko",
    "Casio",
    "Citizen",
    "Blancpain",
    "Breguet",
    "Chopard",
    "Bulgari",
];

/// Sales copy that opens a phrase, e.g. "Looking to buy a pre-owned Rolex ...".
pub const PROMO_LEAD_PATTERN: &str = r"(?i)^\s*looking\s+to\s+(?:buy|sell)(?:\s+(?:an?|the))?(?:\s+(?:pre-?owned|used|brand\s+new|unworn))?\s+";

/// Sales copy that closes a phrase; everything from the match on is dropped.
pub const PROMO_TAIL_PATTERN: &str =
    r"(?i)[\s.,;:!?-]*\b(?:whatsapp\s+us|contact\s+us|call\s+us|enquire\s+now)\b.*$";

/// JSON-LD properties searched for a year, in priority order.
pub const STRUCTURED_YEAR_PROPERTIES: &[&str] =
    &["releaseDate", "productionDate", "modelDate", "description"];
