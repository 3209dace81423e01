use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const DEFAULT_LOCALE: &str = "en";

type Table = HashMap<&'static str, HashMap<&'static str, &'static str>>;

static TRANSLATIONS: Lazy<Table> = Lazy::new(|| {
    let mut table: Table = HashMap::new();

    table.insert(
        "en",
        HashMap::from([
            ("nav.home", "Home"),
            ("nav.properties", "Properties"),
            ("nav.contact", "Contact"),
            ("nav.saved", "Saved Properties"),
            ("search.title", "Find your property"),
            ("search.location", "Location"),
            ("search.minPrice", "Min price"),
            ("search.maxPrice", "Max price"),
            ("search.results", "{count} properties found"),
            ("search.noResults", "No properties match your search."),
            ("property.beds", "{beds} beds"),
            ("property.baths", "{baths} baths"),
            ("contact.success", "Your message has been sent."),
            ("contact.failure", "There was a problem submitting your message."),
        ]),
    );

    table.insert(
        "fr",
        HashMap::from([
            ("nav.home", "Accueil"),
            ("nav.properties", "Propriétés"),
            ("nav.contact", "Contact"),
            ("nav.saved", "Propriétés sauvegardées"),
            ("search.title", "Trouvez votre propriété"),
            ("search.location", "Emplacement"),
            ("search.minPrice", "Prix min"),
            ("search.maxPrice", "Prix max"),
            ("search.results", "{count} propriétés trouvées"),
            ("search.noResults", "Aucune propriété ne correspond à votre recherche."),
            ("property.beds", "{beds} chambres"),
            ("property.baths", "{baths} salles de bain"),
            ("contact.success", "Votre message a été envoyé."),
            ("contact.failure", "Un problème est survenu lors de l'envoi de votre message."),
        ]),
    );

    table
});

/// Known locale codes.
pub fn locales() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = TRANSLATIONS.keys().copied().collect();
    keys.sort_unstable();
    keys
}

/// Look up a message: requested locale first, then the default locale,
/// then the key itself. `vars` substitute `{name}` placeholders.
pub fn translate(locale: &str, key: &str, vars: &HashMap<&str, String>) -> String {
    let effective = if TRANSLATIONS.contains_key(locale) {
        locale
    } else {
        DEFAULT_LOCALE
    };

    let text = TRANSLATIONS
        .get(effective)
        .and_then(|messages| messages.get(key))
        .or_else(|| {
            TRANSLATIONS
                .get(DEFAULT_LOCALE)
                .and_then(|messages| messages.get(key))
        });

    let Some(text) = text else {
        return key.to_string();
    };

    let mut rendered = (*text).to_string();
    for (name, value) in vars {
        rendered = rendered.replace(&format!("{{{}}}", name), value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_key() {
        assert_eq!(translate("fr", "nav.home", &HashMap::new()), "Accueil");
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        assert_eq!(translate("de", "nav.home", &HashMap::new()), "Home");
    }

    #[test]
    fn missing_key_returns_the_key() {
        assert_eq!(translate("en", "nav.missing", &HashMap::new()), "nav.missing");
    }

    #[test]
    fn substitutes_placeholders() {
        let vars = HashMap::from([("count", "7".to_string())]);
        assert_eq!(
            translate("en", "search.results", &vars),
            "7 properties found"
        );
    }
}
