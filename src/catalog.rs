//! League catalog: canonical league slugs and their provider codes.

use serde::Serialize;

/// A league known to the API, keyed by its canonical slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct League {
    pub id: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    /// Code the statistics providers use for this league
    #[serde(skip)]
    pub provider_code: &'static str,
}

const LEAGUES: [League; 5] = [
    League {
        id: "premier-league",
        name: "Premier League",
        country: "England",
        provider_code: "ENG-Premier League",
    },
    League {
        id: "bundesliga",
        name: "Bundesliga",
        country: "Germany",
        provider_code: "GER-Bundesliga",
    },
    League {
        id: "la-liga",
        name: "La Liga",
        country: "Spain",
        provider_code: "ESP-La Liga",
    },
    League {
        id: "serie-a",
        name: "Serie A",
        country: "Italy",
        provider_code: "ITA-Serie A",
    },
    League {
        id: "ligue-1",
        name: "Ligue 1",
        country: "France",
        provider_code: "FRA-Ligue 1",
    },
];

/// Immutable mapping from canonical league slug to provider code.
///
/// Lookups never fail: an unknown slug resolves to itself so the provider
/// gets a chance to understand it (and to reject it with its own message).
#[derive(Debug, Clone, Copy)]
pub struct LeagueCatalog {
    leagues: &'static [League],
}

impl Default for LeagueCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl LeagueCatalog {
    /// The five top European leagues.
    pub const fn standard() -> Self {
        Self { leagues: &LEAGUES }
    }

    /// Resolves a canonical slug to the provider code, passing unknown input through unchanged.
    ///
    /// # Examples
    /// ```
    /// use soccerdata_api::catalog::LeagueCatalog;
    ///
    /// let catalog = LeagueCatalog::standard();
    /// assert_eq!(catalog.resolve("la-liga"), "ESP-La Liga");
    /// assert_eq!(catalog.resolve("unknown-slug"), "unknown-slug");
    /// ```
    pub fn resolve<'a>(&self, canonical_id: &'a str) -> &'a str {
        match self.get(canonical_id) {
            Some(league) => league.provider_code,
            None => canonical_id,
        }
    }

    pub fn get(&self, canonical_id: &str) -> Option<&'static League> {
        self.leagues.iter().find(|league| league.id == canonical_id)
    }

    /// All leagues in catalog order.
    pub fn leagues(&self) -> &'static [League] {
        self.leagues
    }
}
