//! Conversion of plain-text cocktail notes into import records.
//!
//! The notes format is a list of cocktails separated by blank lines:
//!
//! ```text
//! Sloe Gin Fizz
//! - 60 ml sloe gin
//! - 20 ml lemon juice
//! comment: top with soda
//! style: Shaken
//! cocktailCategory: Fizz
//! creator: -
//! ```
//!
//! The first line names the cocktail. Lines starting with `-` are
//! ingredients written as `amount unit name`. Attribute lines override the
//! defaults (style `Shaken`, category `Other`, empty creator and comment).

use std::collections::BTreeMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::CodecError;
use crate::records::{CocktailRecord, IngredientRecord};

const DEFAULT_STYLE: &str = "Shaken";
const DEFAULT_CATEGORY: &str = "Other";

/// Tags in the order they are tried against an ingredient name.
const TAG_ORDER: [&str; 6] = ["whiskey", "rum", "gin", "brandy", "vodka", "tequila"];

/// Keyword table used to classify ingredients by spirit.
///
/// A keyword matches when its words appear as consecutive words of the
/// lower-cased ingredient name, so "gin" tags "sloe gin" but not
/// "ginger beer". Tags are tried in a fixed order (whiskey, rum, gin,
/// brandy, vodka, tequila) and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagKeywords {
    keywords: BTreeMap<String, Vec<Vec<String>>>,
}

impl Default for TagKeywords {
    fn default() -> Self {
        Self::from_pairs([
            ("whiskey", &["whiskey", "whisky", "bourbon", "rye", "scotch"][..]),
            ("rum", &["rum", "rhum", "cachaça", "cachaca"][..]),
            ("gin", &["gin", "genever"][..]),
            ("brandy", &["brandy", "cognac", "armagnac", "calvados", "pisco"][..]),
            ("vodka", &["vodka"][..]),
            ("tequila", &["tequila", "mezcal"][..]),
        ])
    }
}

impl TagKeywords {
    /// Load a keyword table from JSON shaped as `{"tag": ["keyword", ...]}`.
    ///
    /// Tags outside the known spirit list are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] when the JSON is not an object of
    /// string arrays.
    ///
    /// # Example
    ///
    /// ```
    /// use cocktail_snapshots::TagKeywords;
    ///
    /// let table = TagKeywords::from_json(r#"{"gin": ["old tom"]}"#).expect("valid table");
    /// assert_eq!(table.tag_for("Old Tom gin"), Some("gin"));
    /// assert_eq!(table.tag_for("white rum"), None);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct Raw(BTreeMap<String, Vec<String>>);

        let Raw(raw) =
            serde_json::from_str(json).map_err(|err| CodecError::decode(err.to_string()))?;
        Ok(Self::from_pairs(
            raw.iter()
                .map(|(tag, words)| (tag.as_str(), words.as_slice())),
        ))
    }

    fn from_pairs<'a, S>(pairs: impl IntoIterator<Item = (&'a str, &'a [S])>) -> Self
    where
        S: AsRef<str> + 'a,
    {
        let keywords = pairs
            .into_iter()
            .filter(|(tag, _)| TAG_ORDER.iter().any(|known| known == tag))
            .map(|(tag, words)| {
                let phrases = words
                    .iter()
                    .map(|keyword| words_of(keyword.as_ref()))
                    .filter(|phrase| !phrase.is_empty())
                    .collect();
                (tag.to_owned(), phrases)
            })
            .collect();
        Self { keywords }
    }

    /// Return the tag for an ingredient name, if any keyword matches.
    #[must_use]
    pub fn tag_for(&self, ingredient_name: &str) -> Option<&'static str> {
        let name = words_of(ingredient_name);
        TAG_ORDER.into_iter().find(|tag| {
            self.keywords.get(*tag).is_some_and(|phrases| {
                phrases
                    .iter()
                    .any(|phrase| name.windows(phrase.len()).any(|window| window == phrase.as_slice()))
            })
        })
    }
}

fn words_of(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse cocktail notes into records with freshly generated identifiers.
///
/// Ingredient lines with fewer than three parts are skipped; an amount that
/// is not a number is recorded as `0`.
///
/// # Example
///
/// ```
/// use cocktail_snapshots::{TagKeywords, parse_notes};
///
/// let notes = "Sloe Gin Fizz\n- 60 ml sloe gin\n- 20 ml lemon juice\nstyle: Built\n";
/// let cocktails = parse_notes(notes, &TagKeywords::default());
///
/// let fizz = cocktails.first().expect("one cocktail");
/// assert_eq!(fizz.name, "Sloe Gin Fizz");
/// assert_eq!(fizz.style, "Built");
/// assert_eq!(fizz.cocktail_category, "Other");
/// assert_eq!(fizz.ingredients.len(), 2);
/// assert_eq!(fizz.ingredients.first().and_then(|i| i.tag.as_deref()), Some("gin"));
/// ```
#[must_use]
pub fn parse_notes(text: &str, keywords: &TagKeywords) -> Vec<CocktailRecord> {
    let normalised = text.replace("\r\n", "\n");
    normalised
        .split("\n\n")
        .filter_map(|block| parse_block(block, keywords))
        .collect()
}

fn parse_block(block: &str, keywords: &TagKeywords) -> Option<CocktailRecord> {
    let mut lines = block.lines().filter(|line| !line.trim().is_empty());
    let name = lines.next()?.trim().to_owned();

    let mut cocktail = CocktailRecord {
        id: Uuid::new_v4(),
        name,
        creator: String::new(),
        style: DEFAULT_STYLE.to_owned(),
        comment: String::new(),
        cocktail_category: DEFAULT_CATEGORY.to_owned(),
        image_url: None,
        ingredients: Vec::new(),
    };

    for line in lines {
        if let Some(rest) = line.strip_prefix('-') {
            if let Some(ingredient) = parse_ingredient(rest, cocktail.ingredients.len(), keywords)
            {
                cocktail.ingredients.push(ingredient);
            }
        } else if let Some(value) = attribute(line, "comment:") {
            cocktail.comment = value;
        } else if let Some(value) = attribute(line, "cocktailCategory:") {
            cocktail.cocktail_category = value;
        } else if let Some(value) = attribute(line, "creator:") {
            cocktail.creator = value;
        } else if let Some(value) = attribute(line, "style:") {
            cocktail.style = value;
        }
    }

    Some(cocktail)
}

fn attribute(line: &str, key: &str) -> Option<String> {
    line.strip_prefix(key).map(|value| value.trim().to_owned())
}

fn parse_ingredient(
    rest: &str,
    position: usize,
    keywords: &TagKeywords,
) -> Option<IngredientRecord> {
    let (amount, rest) = next_word(rest)?;
    let (unit, rest) = next_word(rest)?;
    let name = rest.trim();
    if name.is_empty() {
        return None;
    }
    let order_index = i32::try_from(position).ok()?;

    Some(IngredientRecord {
        id: Uuid::new_v4(),
        volume: amount.parse().unwrap_or(0.0),
        unit: unit.to_owned(),
        name: name.to_owned(),
        tag: keywords.tag_for(name).map(str::to_owned),
        order_index,
    })
}

/// Split off the first word; runs of whitespace count as one separator.
fn next_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    let end = text.find(char::is_whitespace)?;
    Some(text.split_at(end))
}
