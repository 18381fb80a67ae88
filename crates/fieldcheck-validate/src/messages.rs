//! Message templates, placeholder substitution and the catalog lookup contract.
//!
//! Templates use `:name` placeholders. `:attribute` is replaced with the
//! display name of the field (`:Attribute` and `:ATTRIBUTE` give the
//! capitalized and upper-case forms); every other placeholder is looked up in
//! the parameters of the failing rule.

use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Template used when nothing else matches.
pub const FALLBACK_KEY: &str = "invalid";

/// Source of message templates keyed by locale and rule key.
///
/// Keys are rule codes (`required`), optionally suffixed with a variant
/// (`min.string`).
pub trait MessageCatalog: Send + Sync {
    /// Look up a template.
    fn lookup(&self, locale: &str, key: &str) -> Option<Cow<'_, str>>;
}

const EN: &[(&str, &str)] = &[
    ("alpha", "The :attribute field must only contain letters."),
    ("alpha_num", "The :attribute field must only contain letters and numbers."),
    ("array", "The :attribute field must be an array."),
    ("between.array", "The :attribute field must have between :min and :max items."),
    ("between.numeric", "The :attribute field must be between :min and :max."),
    ("between.string", "The :attribute field must be between :min and :max characters."),
    ("boolean", "The :attribute field must be true or false."),
    ("confirmed", "The :attribute field confirmation does not match."),
    ("different", "The :attribute field and :other must be different."),
    ("email", "The :attribute field must be a valid email address."),
    ("in", "The selected :attribute is invalid."),
    ("integer", "The :attribute field must be an integer."),
    ("invalid", "The :attribute field is invalid."),
    ("max.array", "The :attribute field must not have more than :max items."),
    ("max.numeric", "The :attribute field must not be greater than :max."),
    ("max.string", "The :attribute field must not be greater than :max characters."),
    ("min.array", "The :attribute field must have at least :min items."),
    ("min.numeric", "The :attribute field must be at least :min."),
    ("min.string", "The :attribute field must be at least :min characters."),
    ("not_in", "The selected :attribute is invalid."),
    ("numeric", "The :attribute field must be a number."),
    ("password.letters", "The :attribute field must contain at least one letter."),
    ("password.mixed", "The :attribute field must contain at least one uppercase and one lowercase letter."),
    ("password.numbers", "The :attribute field must contain at least one number."),
    ("password.symbols", "The :attribute field must contain at least one symbol."),
    ("regex", "The :attribute field format is invalid."),
    ("required", "The :attribute field is required."),
    ("same", "The :attribute field must match :other."),
    ("size.array", "The :attribute field must contain :size items."),
    ("size.numeric", "The :attribute field must be :size."),
    ("size.string", "The :attribute field must be :size characters."),
    ("string", "The :attribute field must be a string."),
];

const ID: &[(&str, &str)] = &[
    ("alpha", ":attribute hanya boleh berisi huruf."),
    ("alpha_num", ":attribute hanya boleh berisi huruf dan angka."),
    ("array", ":attribute harus berupa sebuah array."),
    ("between.array", ":attribute harus memiliki :min sampai :max anggota."),
    ("between.numeric", ":attribute harus bernilai antara :min sampai :max."),
    ("between.string", ":attribute harus antara :min dan :max karakter."),
    ("boolean", ":attribute harus bernilai true atau false."),
    ("confirmed", "Konfirmasi :attribute tidak cocok."),
    ("different", ":attribute dan :other harus berbeda."),
    ("email", ":attribute harus berupa alamat surel yang valid."),
    ("in", ":attribute yang dipilih tidak valid."),
    ("integer", ":attribute harus berupa bilangan bulat."),
    ("invalid", ":attribute tidak valid."),
    ("max.array", ":attribute maksimal terdiri dari :max anggota."),
    ("max.numeric", ":attribute maksimal bernilai :max."),
    ("max.string", ":attribute maksimal berisi :max karakter."),
    ("min.array", ":attribute minimal terdiri dari :min anggota."),
    ("min.numeric", ":attribute minimal bernilai :min."),
    ("min.string", ":attribute minimal berisi :min karakter."),
    ("not_in", ":attribute yang dipilih tidak valid."),
    ("numeric", ":attribute harus berupa angka."),
    ("password.letters", ":attribute harus mengandung setidaknya satu huruf."),
    ("password.mixed", ":attribute harus mengandung setidaknya satu huruf kapital dan satu huruf kecil."),
    ("password.numbers", ":attribute harus mengandung setidaknya satu angka."),
    ("password.symbols", ":attribute harus mengandung setidaknya satu simbol."),
    ("regex", "Format :attribute tidak valid."),
    ("required", ":attribute wajib diisi."),
    ("same", ":attribute dan :other harus sama."),
    ("size.array", ":attribute harus mengandung :size anggota."),
    ("size.numeric", ":attribute harus berukuran :size."),
    ("size.string", ":attribute harus berukuran :size karakter."),
    ("string", ":attribute harus berupa string."),
];

/// Built-in catalog with English (`en`) and Indonesian (`id`) templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

impl MessageCatalog for DefaultCatalog {
    fn lookup(&self, locale: &str, key: &str) -> Option<Cow<'_, str>> {
        let table = match locale {
            "en" => EN,
            "id" => ID,
            _ => return None,
        };
        table
            .binary_search_by(|(k, _)| k.cmp(&key))
            .ok()
            .map(|i| Cow::Borrowed(table[i].1))
    }
}

/// In-memory catalog, consulted before an optional parent catalog.
#[derive(Default)]
pub struct MapCatalog {
    locales: HashMap<String, HashMap<String, String>>,
    parent: Option<Box<dyn MessageCatalog>>,
}

impl MapCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog that falls back to [`DefaultCatalog`].
    pub fn with_defaults() -> Self {
        Self {
            locales: HashMap::new(),
            parent: Some(Box::new(DefaultCatalog)),
        }
    }

    /// Add a template.
    pub fn insert(
        mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.locales
            .entry(locale.into())
            .or_default()
            .insert(key.into(), template.into());
        self
    }
}

impl MessageCatalog for MapCatalog {
    fn lookup(&self, locale: &str, key: &str) -> Option<Cow<'_, str>> {
        self.locales
            .get(locale)
            .and_then(|messages| messages.get(key))
            .map(|template| Cow::Borrowed(template.as_str()))
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup(locale, key)))
    }
}

impl std::fmt::Debug for MapCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapCatalog")
            .field("locales", &self.locales.keys().collect::<Vec<_>>())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Default display name for a concrete path: underscores become spaces.
pub fn display_attribute(path: &str) -> String {
    path.replace('_', " ")
}

/// Render a parameter value for substitution.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Substitute `:placeholders` in a template.
///
/// A placeholder is a `:` followed by an identifier. When the whole
/// identifier is not a known name, its longest known prefix is replaced and
/// the remaining characters are kept, so `:attributes` becomes the attribute
/// followed by `s`. Unknown placeholders are left as written.
pub fn interpolate(template: &str, attribute: &str, params: &BTreeMap<String, Value>) -> String {
    let mut out = String::with_capacity(template.len() + attribute.len());
    let mut rest = template;

    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];

        // identifiers are ASCII, so every prefix length is a char boundary
        let known = (1..=name_len)
            .rev()
            .find_map(|len| replacement(&name[..len], attribute, params).map(|value| (len, value)));
        match known {
            Some((len, value)) => {
                out.push_str(&value);
                rest = &after[len..];
            }
            None => {
                out.push(':');
                out.push_str(name);
                rest = &after[name_len..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn replacement(name: &str, attribute: &str, params: &BTreeMap<String, Value>) -> Option<String> {
    match name {
        "" => None,
        "attribute" => Some(attribute.to_string()),
        "Attribute" => Some(capitalize(attribute)),
        "ATTRIBUTE" => Some(attribute.to_uppercase()),
        other => params.get(other).map(render_value),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tables_are_sorted() {
        for table in [EN, ID] {
            assert!(table.windows(2).all(|w| w[0].0 < w[1].0));
        }
        assert_eq!(EN.len(), ID.len());
    }

    #[test]
    fn default_catalog_lookup() {
        let catalog = DefaultCatalog;
        assert_eq!(
            catalog.lookup("en", "required").as_deref(),
            Some("The :attribute field is required.")
        );
        assert_eq!(
            catalog.lookup("id", "min.string").as_deref(),
            Some(":attribute minimal berisi :min karakter.")
        );
        assert!(catalog.lookup("fr", "required").is_none());
        assert!(catalog.lookup("en", "nope").is_none());
    }

    #[test]
    fn map_catalog_overrides_parent() {
        let catalog = MapCatalog::with_defaults().insert("en", "required", "Please fill in :attribute.");
        assert_eq!(
            catalog.lookup("en", "required").as_deref(),
            Some("Please fill in :attribute.")
        );
        assert_eq!(
            catalog.lookup("en", "email").as_deref(),
            Some("The :attribute field must be a valid email address.")
        );
        assert!(MapCatalog::new().lookup("en", "email").is_none());
    }

    #[test]
    fn interpolate_attribute_and_params() {
        let mut params = BTreeMap::new();
        params.insert("min".to_string(), json!(6));
        params.insert("values".to_string(), json!(["Ahzi", "Budi"]));

        assert_eq!(
            interpolate(":attribute minimal :min karakter", "password", &params),
            "password minimal 6 karakter"
        );
        assert_eq!(
            interpolate(":Attribute must be one of: :values.", "user name", &params),
            "User name must be one of: Ahzi, Budi."
        );
        assert_eq!(interpolate(":ATTRIBUTE", "city", &params), "CITY");
    }

    #[test]
    fn interpolate_leaves_unknown_placeholders() {
        let params = BTreeMap::new();
        assert_eq!(
            interpolate("at 10:30 :unknown :attribute:", "time", &params),
            "at 10:30 :unknown time:"
        );
    }

    #[test]
    fn interpolate_replaces_longest_known_prefix() {
        let mut params = BTreeMap::new();
        params.insert("min".to_string(), json!(2));
        params.insert("minimum".to_string(), json!(5));

        assert_eq!(
            interpolate("Too few :attributes, need :mins.", "tag", &params),
            "Too few tags, need 2s."
        );
        assert_eq!(interpolate(":minimum_count", "x", &params), "5_count");
        assert_eq!(interpolate(":Attribute_name", "city", &params), "City_name");
    }

    #[test]
    fn display_attribute_replaces_underscores() {
        assert_eq!(display_attribute("first_name"), "first name");
        assert_eq!(display_attribute("address.0.city"), "address.0.city");
    }
}
