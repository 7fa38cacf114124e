//! Recipe search query parsing.
//!
//! Supported syntax:
//! - plain text: matches name, cuisine or author
//! - `tag:value` (repeatable, all must match)
//! - `cuisine:value`, `author:value`
//! - `diet:vegan` (repeatable; unknown restrictions are ignored)
//! - `location:online|cookbook|made_up`
//! - `meal:dinner`, `type:dessert` (unknown values are ignored)
//! - `saved:>2024-01-01`, `saved:<2024-12-31`, `saved:2024-01-01..2024-12-31`, `saved:2024-03-15`
//!
//! Double quotes group words: `"green beans" tag:side`.

use crate::types::{DietaryRestriction, Meal, RecipeType};
use chrono::NaiveDate;

#[derive(Debug, Default, PartialEq)]
pub struct ParsedQuery {
    pub text: Vec<String>,
    pub tags: Vec<String>,
    pub cuisine: Option<String>,
    pub author: Option<String>,
    pub diets: Vec<DietaryRestriction>,
    pub location: Option<String>,
    pub meal: Option<Meal>,
    pub recipe_type: Option<RecipeType>,
    pub saved_after: Option<NaiveDate>,
    pub saved_before: Option<NaiveDate>,
}

pub fn parse_query(q: &str) -> ParsedQuery {
    let mut result = ParsedQuery::default();

    for token in tokenize(q) {
        if let Some(tag) = token.strip_prefix("tag:") {
            if !tag.is_empty() {
                result.tags.push(tag.to_string());
            }
        } else if let Some(cuisine) = token.strip_prefix("cuisine:") {
            if !cuisine.is_empty() {
                result.cuisine = Some(cuisine.to_string());
            }
        } else if let Some(author) = token.strip_prefix("author:") {
            if !author.is_empty() {
                result.author = Some(author.to_string());
            }
        } else if let Some(diet) = token.strip_prefix("diet:") {
            if let Some(restriction) = DietaryRestriction::from_str(diet) {
                if !result.diets.contains(&restriction) {
                    result.diets.push(restriction);
                }
            }
        } else if let Some(location) = token.strip_prefix("location:") {
            match location {
                "online" | "cookbook" | "made_up" => result.location = Some(location.to_string()),
                "made-up" => result.location = Some("made_up".to_string()),
                _ => {}
            }
        } else if let Some(meal) = token.strip_prefix("meal:") {
            result.meal = Meal::from_str(meal).or(result.meal);
        } else if let Some(recipe_type) = token.strip_prefix("type:") {
            result.recipe_type = RecipeType::from_str(recipe_type).or(result.recipe_type);
        } else if let Some(date_expr) = token.strip_prefix("saved:") {
            parse_date_filter(date_expr, &mut result);
        } else if !token.is_empty() {
            result.text.push(token);
        }
    }

    result
}

fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_date_filter(expr: &str, result: &mut ParsedQuery) {
    if let Some((start, end)) = expr.split_once("..") {
        result.saved_after = parse_date(start).or(result.saved_after);
        result.saved_before = parse_date(end).or(result.saved_before);
    } else if let Some(date) = expr.strip_prefix('>') {
        result.saved_after = parse_date(date).or(result.saved_after);
    } else if let Some(date) = expr.strip_prefix('<') {
        result.saved_before = parse_date(date).or(result.saved_before);
    } else if let Some(date) = parse_date(expr) {
        result.saved_after = Some(date);
        result.saved_before = Some(date);
    }
}

/// Escape `%` and `_` and wrap in wildcards for an ILIKE substring match.
pub fn like_pattern(s: &str) -> String {
    format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_query() {
        assert_eq!(parse_query(""), ParsedQuery::default());
        assert_eq!(parse_query("   \t "), ParsedQuery::default());
    }

    #[test]
    fn test_parse_plain_text() {
        let parsed = parse_query("chicken soup");
        assert_eq!(parsed.text, vec!["chicken", "soup"]);
    }

    #[test]
    fn test_parse_tags() {
        let parsed = parse_query("tag:dinner tag:quick tag:");
        assert_eq!(parsed.tags, vec!["dinner", "quick"]);
    }

    #[test]
    fn test_parse_mixed() {
        let parsed = parse_query("stew cuisine:Irish author:Nigel diet:gluten-free location:cookbook");
        assert_eq!(parsed.text, vec!["stew"]);
        assert_eq!(parsed.cuisine.as_deref(), Some("Irish"));
        assert_eq!(parsed.author.as_deref(), Some("Nigel"));
        assert_eq!(parsed.diets, vec![DietaryRestriction::GlutenFree]);
        assert_eq!(parsed.location.as_deref(), Some("cookbook"));
    }

    #[test]
    fn test_parse_unknown_diet_and_location_ignored() {
        let parsed = parse_query("diet:keto diet:vegan diet:vegan location:restaurant");
        assert_eq!(parsed.diets, vec![DietaryRestriction::Vegan]);
        assert!(parsed.location.is_none());
        assert!(parsed.text.is_empty());
    }

    #[test]
    fn test_parse_meal_and_type() {
        let parsed = parse_query("meal:Dinner type:dessert cake");
        assert_eq!(parsed.meal, Some(Meal::Dinner));
        assert_eq!(parsed.recipe_type, Some(RecipeType::Dessert));
        assert_eq!(parsed.text, vec!["cake"]);

        let parsed = parse_query("meal:brunch type:");
        assert_eq!(parsed.meal, None);
        assert_eq!(parsed.recipe_type, None);
        assert!(parsed.text.is_empty());
    }

    #[test]
    fn test_parse_saved_dates() {
        let parsed = parse_query("saved:>2024-01-15");
        assert_eq!(parsed.saved_after, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!(parsed.saved_before.is_none());

        let parsed = parse_query("saved:<2024-12-31");
        assert!(parsed.saved_after.is_none());
        assert_eq!(parsed.saved_before, NaiveDate::from_ymd_opt(2024, 12, 31));

        let parsed = parse_query("saved:2024-01-01..2024-06-30");
        assert_eq!(parsed.saved_after, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(parsed.saved_before, NaiveDate::from_ymd_opt(2024, 6, 30));

        let parsed = parse_query("saved:2024-03-15");
        assert_eq!(parsed.saved_after, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parsed.saved_before, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_parse_bad_date_is_ignored() {
        let parsed = parse_query("saved:yesterday");
        assert!(parsed.saved_after.is_none());
        assert!(parsed.saved_before.is_none());
        assert!(parsed.text.is_empty());
    }

    #[test]
    fn test_parse_quoted_text() {
        let parsed = parse_query("\"green beans\" tag:side");
        assert_eq!(parsed.text, vec!["green beans"]);
        assert_eq!(parsed.tags, vec!["side"]);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
