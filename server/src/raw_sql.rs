//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! User input is ALWAYS passed via `.bind()` parameters, never interpolated.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::BigInt;

/// `COUNT(*) OVER()`: total row count before LIMIT/OFFSET.
///
/// Diesel doesn't support window functions natively.
pub fn count_over() -> SqlLiteral<BigInt> {
    sql::<BigInt>("COUNT(*) OVER()")
}

/// Recipe has a tag equal (case-insensitively) to the bound value.
///
/// Correlated on `recipes.id`, so only valid in a query over `recipes`.
#[macro_export]
macro_rules! recipe_has_tag {
    ($tag:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>(
            "EXISTS (SELECT 1 FROM recipe_tags rt WHERE rt.recipe_id = recipes.id AND LOWER(rt.tag) = LOWER(",
        )
        .bind::<diesel::sql_types::Text, _>($tag)
        .sql("))")
    };
}

/// Recipe meets the bound dietary restriction.
#[macro_export]
macro_rules! recipe_meets_restriction {
    ($restriction:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>(
            "EXISTS (SELECT 1 FROM recipe_dietary_restrictions rdr WHERE rdr.recipe_id = recipes.id AND rdr.restriction = ",
        )
        .bind::<diesel::sql_types::Text, _>($restriction)
        .sql(")")
    };
}

/// Recipe's location blob has the bound kind (`online`, `cookbook`, `made_up`).
///
/// Diesel has no `->>` operator for JSONB.
#[macro_export]
macro_rules! recipe_location_is {
    ($kind:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("recipes.location->>'location' = ")
            .bind::<diesel::sql_types::Text, _>($kind)
    };
}

/// Distinct tags across a user's recipes, first spelling wins, sorted
/// case-insensitively.
///
/// The user_id MUST be passed via `.bind()` as `$1`.
pub const DISTINCT_TAGS_QUERY: &str = "SELECT tag FROM ( \
        SELECT DISTINCT ON (LOWER(rt.tag)) rt.tag AS tag \
        FROM recipe_tags rt \
        JOIN recipes r ON r.id = rt.recipe_id \
        WHERE r.user_id = $1 \
        ORDER BY LOWER(rt.tag), rt.tag \
    ) t ORDER BY LOWER(tag)";
