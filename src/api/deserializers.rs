use serde::{Deserialize, Deserializer};

/// Deserialize a field that can be a single item, a vector of items, null,
/// or a blank string standing in for "nothing"
pub fn single_or_vec_or_null<'de, T, D>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    // Multiple must be tried before Single: derived structs also accept sequences.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SingleOrVecOrNull<T> {
        Null,
        Multiple(Vec<T>),
        Single(T),
        Blank(String),
    }

    match SingleOrVecOrNull::deserialize(deserializer)? {
        SingleOrVecOrNull::Null => Ok(None),
        SingleOrVecOrNull::Multiple(vec) => Ok(Some(vec)),
        SingleOrVecOrNull::Single(val) => Ok(Some(vec![val])),
        SingleOrVecOrNull::Blank(s) => blank_or_error(s).map(|()| None),
    }
}

/// Deserialize the `items` wrapper of a result body into a flat list.
///
/// The upstream service sends `{"item": ...}` when there are matches, but an
/// empty string or `null` (for the wrapper or for `item`) when there are none.
pub fn items_or_empty<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged, bound = "T: Deserialize<'de>")]
    enum ItemsField<T> {
        Wrapped {
            #[serde(default, deserialize_with = "single_or_vec_or_null")]
            item: Option<Vec<T>>,
        },
        Blank(String),
    }

    match Option::<ItemsField<T>>::deserialize(deserializer)? {
        Some(ItemsField::Wrapped { item }) => Ok(item.unwrap_or_default()),
        Some(ItemsField::Blank(s)) => blank_or_error(s).map(|()| Vec::new()),
        None => Ok(Vec::new()),
    }
}

fn blank_or_error<E: serde::de::Error>(s: String) -> Result<(), E> {
    if s.trim().is_empty() {
        Ok(())
    } else {
        Err(E::custom(format!("expected item data, found string '{}'", s)))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// Deserialize a code that may arrive as `"00"` or as a bare number
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

/// Same as [`string_or_number`], but tolerates `null`
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}
