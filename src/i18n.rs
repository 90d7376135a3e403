use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dashboard display language. Also selects the news feed set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }

    /// Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "de" => Language::De,
            _ => Language::En,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::De,
            Language::De => Language::En,
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("news", "News"),
    ("source", "Source"),
    ("currency", "Currency"),
    ("add_symbol", "Add"),
    ("placeholder_symbol", "Add symbol (e.g. BTC)"),
    ("change_24h", "24h"),
    ("remove", "Remove"),
    ("refreshing", "Refreshing…"),
    ("refresh", "Refresh"),
    ("unknown_symbol", "Unknown symbol: %s"),
    ("weather", "Weather"),
    ("search_city", "Search city..."),
    ("forecast", "Forecast"),
    ("calculator", "Calculator"),
    ("work_timer", "Work Timer"),
    ("time_remaining", "Time remaining until"),
    ("not_set", "Not set"),
    ("set_end_time", "Set End Time"),
    ("save", "Save"),
    ("cancel", "Cancel"),
    ("error", "Error"),
    ("failed_to_fetch", "Failed to fetch weather data. Please try again."),
    (
        "city_not_found",
        "Could not find coordinates for \"%s\". Please try a different city.",
    ),
    ("news_failed", "Could not load the news feed."),
    ("last_update", "Last update"),
    ("dashboard_title", "My Co-Dash"),
    ("select_color", "Select Accent Color"),
    ("dark_mode", "Dark mode"),
    ("language", "Language"),
    // WMO weather code descriptions.
    ("Clear sky", "Clear sky"),
    ("Mainly clear", "Mainly clear"),
    ("Partly cloudy", "Partly cloudy"),
    ("Overcast", "Overcast"),
    ("Fog", "Fog"),
    ("Depositing rime fog", "Depositing rime fog"),
    ("Light drizzle", "Light drizzle"),
    ("Moderate drizzle", "Moderate drizzle"),
    ("Dense drizzle", "Dense drizzle"),
    ("Light freezing drizzle", "Light freezing drizzle"),
    ("Dense freezing drizzle", "Dense freezing drizzle"),
    ("Slight rain", "Slight rain"),
    ("Moderate rain", "Moderate rain"),
    ("Heavy rain", "Heavy rain"),
    ("Light freezing rain", "Light freezing rain"),
    ("Heavy freezing rain", "Heavy freezing rain"),
    ("Slight snow fall", "Slight snow fall"),
    ("Moderate snow fall", "Moderate snow fall"),
    ("Heavy snow fall", "Heavy snow fall"),
    ("Snow grains", "Snow grains"),
    ("Slight rain showers", "Slight rain showers"),
    ("Moderate rain showers", "Moderate rain showers"),
    ("Violent rain showers", "Violent rain showers"),
    ("Slight snow showers", "Slight snow showers"),
    ("Heavy snow showers", "Heavy snow showers"),
    ("Thunderstorm", "Thunderstorm"),
    ("Thunderstorm with slight hail", "Thunderstorm with slight hail"),
    ("Thunderstorm with heavy hail", "Thunderstorm with heavy hail"),
    ("Unknown", "Unknown"),
];

const DE: &[(&str, &str)] = &[
    ("news", "Nachrichten"),
    ("source", "Quelle"),
    ("currency", "Währung"),
    ("add_symbol", "Hinzufügen"),
    ("placeholder_symbol", "Symbol hinzufügen (z. B. BTC)"),
    ("change_24h", "24h"),
    ("remove", "Entfernen"),
    ("refreshing", "Aktualisiere…"),
    ("refresh", "Neu laden"),
    ("unknown_symbol", "Unbekanntes Symbol: %s"),
    ("weather", "Wetter"),
    ("search_city", "Stadt suchen..."),
    ("forecast", "Vorhersage"),
    ("calculator", "Rechner"),
    ("work_timer", "Arbeits-Timer"),
    ("time_remaining", "Verbleibende Zeit bis"),
    ("not_set", "Nicht festgelegt"),
    ("set_end_time", "Endzeit festlegen"),
    ("save", "Speichern"),
    ("cancel", "Abbrechen"),
    ("error", "Fehler"),
    (
        "failed_to_fetch",
        "Wetterdaten konnten nicht abgerufen werden. Bitte versuchen Sie es erneut.",
    ),
    (
        "city_not_found",
        "Koordinaten für \"%s\" nicht gefunden. Bitte versuchen Sie eine andere Stadt.",
    ),
    ("news_failed", "News konnten nicht geladen werden."),
    ("last_update", "Letztes Update"),
    ("dashboard_title", "Mein Co-Dash"),
    ("select_color", "Akzentfarbe wählen"),
    ("dark_mode", "Dunkelmodus"),
    ("language", "Sprache"),
    ("Clear sky", "Klarer Himmel"),
    ("Mainly clear", "Überwiegend klar"),
    ("Partly cloudy", "Teilweise bewölkt"),
    ("Overcast", "Bedeckt"),
    ("Fog", "Nebel"),
    ("Depositing rime fog", "Reifnebel"),
    ("Light drizzle", "Leichter Nieselregen"),
    ("Moderate drizzle", "Mäßiger Nieselregen"),
    ("Dense drizzle", "Starker Nieselregen"),
    ("Light freezing drizzle", "Leichter gefrierender Nieselregen"),
    ("Dense freezing drizzle", "Starker gefrierender Nieselregen"),
    ("Slight rain", "Leichter Regen"),
    ("Moderate rain", "Mäßiger Regen"),
    ("Heavy rain", "Starker Regen"),
    ("Light freezing rain", "Leichter gefrierender Regen"),
    ("Heavy freezing rain", "Starker gefrierender Regen"),
    ("Slight snow fall", "Leichter Schneefall"),
    ("Moderate snow fall", "Mäßiger Schneefall"),
    ("Heavy snow fall", "Starker Schneefall"),
    ("Snow grains", "Schneegriesel"),
    ("Slight rain showers", "Leichte Regenschauer"),
    ("Moderate rain showers", "Mäßige Regenschauer"),
    ("Violent rain showers", "Heftige Regenschauer"),
    ("Slight snow showers", "Leichte Schneeschauer"),
    ("Heavy snow showers", "Starke Schneeschauer"),
    ("Thunderstorm", "Gewitter"),
    ("Thunderstorm with slight hail", "Gewitter mit leichtem Hagel"),
    ("Thunderstorm with heavy hail", "Gewitter mit starkem Hagel"),
    ("Unknown", "Unbekannt"),
];

static EN_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| EN.iter().copied().collect());
static DE_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| DE.iter().copied().collect());

fn table(language: Language) -> &'static HashMap<&'static str, &'static str> {
    match language {
        Language::En => &EN_MAP,
        Language::De => &DE_MAP,
    }
}

/// Look up a translation. A key missing from the active language falls back
/// to English, then to the key itself; rendering never breaks over a missing
/// entry, it is only logged.
pub fn tr(language: Language, key: &str) -> String {
    if let Some(text) = table(language).get(key) {
        return (*text).to_string();
    }
    if language != Language::En {
        if let Some(text) = table(Language::En).get(key) {
            tracing::warn!("translation key '{key}' missing for '{}'", language.code());
            return (*text).to_string();
        }
    }
    tracing::warn!("unknown translation key '{key}'");
    key.to_string()
}

/// `tr` with a single `%s` placeholder substitution.
pub fn tr_with(language: Language, key: &str, arg: &str) -> String {
    tr(language, key).replace("%s", arg)
}
