/// Choices offered for the wizard's sector field.
pub const SECTORS: [&str; 15] = [
    "Commerce de détail",
    "Services aux entreprises",
    "Tech / Digital",
    "Restauration",
    "Artisanat",
    "Conseil",
    "Formation",
    "Santé / Bien-être",
    "Immobilier",
    "Transport / Logistique",
    "Communication / Marketing",
    "Industrie",
    "Agriculture",
    "BTP",
    "Autre",
];

pub fn is_known_sector(value: &str) -> bool {
    SECTORS.contains(&value)
}
