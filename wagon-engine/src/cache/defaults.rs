use shared::models::Recipe;
use std::collections::BTreeMap;

/// Menu used until (or unless) the remote store provides one
const DEFAULT_RECIPES: [(&str, i64); 16] = [
    ("Steak with potatoes", 85),
    ("Meat stew", 75),
    ("Can of chili", 65),
    ("Spaghetti", 55),
    ("Shepherd's pie", 90),
    ("Chicken soup", 60),
    ("Vegetable stew", 45),
    ("Gumbo", 70),
    ("Cornbread", 35),
    ("Pumpkin pie", 50),
    ("Chili dog", 40),
    ("Fish tacos", 45),
    ("Boiled egg", 20),
    ("Blueberries", 15),
    ("Jar of honey", 30),
    ("Can of broth", 35),
];

pub fn default_menu() -> BTreeMap<i64, Recipe> {
    DEFAULT_RECIPES
        .iter()
        .zip(1..)
        .map(|(&(name, price), id)| (id, Recipe::new(id, name, price)))
        .collect()
}
