//! Static industry classification lookup (KSIC divisions and sections).

/// Division-level codes (section letter + two digits)
const DIVISIONS: &[(&str, &str)] = &[
    ("A01", "Agriculture"),
    ("B05", "Coal Mining"),
    ("C10", "Food Products Manufacturing"),
    ("C13", "Textile Manufacturing"),
    ("C20", "Chemical Products Manufacturing"),
    ("C21", "Pharmaceutical Manufacturing"),
    ("C22", "Rubber and Plastic Products Manufacturing"),
    ("C24", "Basic Metals Manufacturing"),
    ("C25", "Fabricated Metal Products Manufacturing"),
    ("C26", "Electronic Components and Communication Equipment Manufacturing"),
    ("C27", "Medical and Precision Instruments Manufacturing"),
    ("C28", "Electrical Equipment Manufacturing"),
    ("C29", "Machinery Manufacturing"),
    ("C30", "Motor Vehicle Manufacturing"),
    ("C31", "Other Transport Equipment Manufacturing"),
    ("D35", "Electricity and Gas Supply"),
    ("E38", "Waste Collection and Recycling"),
    ("F41", "General Construction"),
    ("F42", "Specialized Construction"),
    ("G45", "Motor Vehicle Sales"),
    ("G46", "Wholesale Trade"),
    ("G47", "Retail Trade"),
    ("H49", "Land Transport"),
    ("H50", "Water Transport"),
    ("H51", "Air Transport"),
    ("H52", "Warehousing and Logistics"),
    ("I55", "Accommodation"),
    ("I56", "Food and Beverage Services"),
    ("J58", "Publishing"),
    ("J61", "Telecommunications"),
    ("J62", "Software Development and IT Services"),
    ("J63", "Information Services"),
    ("K64", "Financial Services"),
    ("K65", "Insurance"),
    ("K66", "Financial Auxiliary Services"),
    ("L68", "Real Estate"),
    ("M70", "Research and Development"),
    ("M71", "Professional Services"),
    ("M72", "Architecture and Engineering Services"),
    ("N75", "Business Support Services"),
    ("P85", "Education"),
    ("Q86", "Health Care"),
    ("R90", "Creative Arts and Entertainment"),
];

/// Section-level fallback when a division is not listed
const SECTIONS: &[(char, &str)] = &[
    ('A', "Agriculture, Forestry and Fishing"),
    ('B', "Mining and Quarrying"),
    ('C', "Manufacturing"),
    ('D', "Electricity, Gas and Steam Supply"),
    ('E', "Water Supply and Waste Management"),
    ('F', "Construction"),
    ('G', "Wholesale and Retail Trade"),
    ('H', "Transportation and Storage"),
    ('I', "Accommodation and Food Services"),
    ('J', "Information and Communication"),
    ('K', "Financial and Insurance Activities"),
    ('L', "Real Estate Activities"),
    ('M', "Professional, Scientific and Technical Activities"),
    ('N', "Business Facilities Management and Support Services"),
    ('O', "Public Administration and Defence"),
    ('P', "Education"),
    ('Q', "Human Health and Social Work"),
    ('R', "Arts, Sports and Recreation"),
    ('S', "Membership Organizations and Personal Services"),
];

/// Resolve an industry code to a display name.
///
/// Codes are matched case-insensitively on their first three characters
/// (`C26`, `C261`, `c2611` all resolve to the same division); an unlisted
/// division falls back to its section name.
pub fn industry_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_ascii_uppercase();
    let section = code.chars().next()?;

    let division: String = code.chars().take(3).collect();
    DIVISIONS
        .iter()
        .find(|(c, _)| *c == division)
        .map(|(_, name)| *name)
        .or_else(|| {
            SECTIONS
                .iter()
                .find(|(s, _)| *s == section)
                .map(|(_, name)| *name)
        })
}
