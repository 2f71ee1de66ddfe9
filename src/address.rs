/// Well-known places in Barcelona and Ibiza offered while typing an address.
pub const ADDRESS_SUGGESTIONS: &[&str] = &[
    // Barcelona
    "Sagrada Família, Barcelona, Spain",
    "Park Güell, Barcelona, Spain",
    "Las Ramblas, Barcelona, Spain",
    "Pg. de Gràcia, Barcelona, Spain",
    "Carrer de Mallorca, Barcelona, Spain",
    "Plaça Catalunya, Barcelona, Spain",
    "Gothic Quarter, Barcelona, Spain",
    "Barceloneta Beach, Barcelona, Spain",
    "Camp Nou, Barcelona, Spain",
    "Passeig de Joan de Borbó, Barcelona, Spain",
    // Ibiza
    "Playa d'en Bossa, Ibiza, Spain",
    "San Antonio, Ibiza, Spain",
    "Ibiza Town, Ibiza, Spain",
    "Es Vedra, Ibiza, Spain",
    "Cala Comte, Ibiza, Spain",
    "Ushuaïa Ibiza Beach Hotel, Ibiza, Spain",
    "Pacha Ibiza, Ibiza, Spain",
    "Amnesia Ibiza, Ibiza, Spain",
    "DC10 Ibiza, Ibiza, Spain",
    "Café del Mar, Ibiza, Spain",
];

pub const MAX_SUGGESTIONS: usize = 5;

/// Case-insensitive substring matches, in list order. Queries of two
/// characters or fewer match nothing.
pub fn suggest(query: &str) -> Vec<&'static str> {
    if query.chars().count() <= 2 {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    ADDRESS_SUGGESTIONS
        .iter()
        .copied()
        .filter(|address| address.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}
