//! Fixed user-facing phrases and vocabulary.

/// Acknowledgment when the user approves a suggestion.
pub const POSITIVE: &str = "Great!";

/// Reply to thanks.
pub const WELCOME: &str = "You're welcome!";

/// Search returned no businesses at all.
pub const NO_PLACES_NEARBY: &str = "I couldn't find any places like that nearby.";

/// The requested offset is past the end of the results.
pub const NOTHING_MORE: &str = "That's all I could find.";

/// Follow-up after a search that found nothing.
pub const NOTHING_FOUND: &str = "I couldn't find anything like that";

/// Food vocabulary recognised as search subjects.
pub const FOODS: &[&str] = &[
    "bagel", "bagels", "bakery", "barbecue", "bbq", "breakfast", "brunch", "burger",
    "burgers", "burrito", "burritos", "cafe", "chicken", "chinese", "coffee", "curry",
    "dessert", "desserts", "diner", "dinner", "donut", "donuts", "dumplings", "food",
    "french", "fries", "greek", "indian", "italian", "japanese", "korean", "lunch",
    "mediterranean", "mexican", "noodles", "pasta", "pho", "pizza", "ramen", "restaurant",
    "restaurants", "salad", "sandwich", "sandwiches", "seafood", "steak", "steakhouse",
    "sushi", "taco", "tacos", "thai", "vegan", "vegetarian", "vietnamese", "wings",
];
