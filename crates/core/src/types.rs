/// Surrogate keys (`attribute_values.id`) are SQLite INTEGER PRIMARY KEYs.
pub type DbId = i64;
