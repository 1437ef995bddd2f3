//! # Catalog Module
//!
//! Static menu data: every orderable item with its display name, price in
//! hryvnias and an optional serving note, partitioned into categories.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Menu category. Declaration order is the order categories appear on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Mains,
    Addons,
    Sides,
    Desserts,
    Drinks,
}

impl Category {
    /// Order of groups in summaries and the cart. Add-ons always come last.
    pub const SUMMARY_ORDER: [Category; 5] = [
        Category::Mains,
        Category::Sides,
        Category::Desserts,
        Category::Drinks,
        Category::Addons,
    ];

    /// Categories reachable directly from the home screen.
    pub const HOME: [Category; 4] = [
        Category::Mains,
        Category::Sides,
        Category::Desserts,
        Category::Drinks,
    ];

    /// Namespace used in callback payloads
    pub fn slug(self) -> &'static str {
        match self {
            Category::Mains => "mains",
            Category::Addons => "addons",
            Category::Sides => "sides",
            Category::Desserts => "desserts",
            Category::Drinks => "drinks",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "mains" => Some(Category::Mains),
            "addons" => Some(Category::Addons),
            "sides" => Some(Category::Sides),
            "desserts" => Some(Category::Desserts),
            "drinks" => Some(Category::Drinks),
            _ => None,
        }
    }
}

/// A single orderable item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub note: Option<&'static str>,
}

impl CatalogItem {
    const fn new(id: &'static str, name: &'static str, price: u32) -> Self {
        Self {
            id,
            name,
            price,
            note: None,
        }
    }

    const fn with_note(id: &'static str, name: &'static str, price: u32, note: &'static str) -> Self {
        Self {
            id,
            name,
            price,
            note: Some(note),
        }
    }
}

/// Read-only lookup table of menu items per category
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: BTreeMap<Category, Vec<CatalogItem>>,
}

impl Catalog {
    /// Build a catalog from explicit item lists
    pub fn new(categories: BTreeMap<Category, Vec<CatalogItem>>) -> Self {
        Self { categories }
    }

    /// The house menu
    pub fn standard() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(
            Category::Mains,
            vec![
                CatalogItem::new("koko", "Коко", 260),
                CatalogItem::new("disney", "Дісней", 160),
            ],
        );
        categories.insert(
            Category::Addons,
            vec![
                CatalogItem::new("onion", "Цибуля", 10),
                CatalogItem::new("mozz", "Моцарелла", 20),
            ],
        );
        categories.insert(
            Category::Sides,
            vec![
                CatalogItem::with_note("sweet_fries", "Батат-фрі", 185, "подається з трюфельним соусом"),
                CatalogItem::with_note("dips", "Діпи", 150, "подається з сирним соусом"),
                CatalogItem::with_note("falafel", "Фалафель", 165, "подається з хумусом"),
                CatalogItem::with_note("cheese_balls", "Сирні кульки", 140, "подається з ягідним соусом"),
            ],
        );
        categories.insert(
            Category::Desserts,
            vec![
                CatalogItem::new("pear_dorblu", "Торт Груша-Дорблю", 160),
                CatalogItem::new("carrot", "Торт Морквʼяний", 150),
                CatalogItem::new("brownie", "Брауні", 130),
            ],
        );
        categories.insert(
            Category::Drinks,
            vec![
                CatalogItem::new("cola", "Кола", 70),
                CatalogItem::new("ayran", "Айран", 95),
                CatalogItem::new("capp", "Капучино", 120),
            ],
        );
        Self { categories }
    }

    /// Items of a category in menu order
    pub fn items(&self, category: Category) -> &[CatalogItem] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn lookup(&self, category: Category, id: &str) -> Option<&CatalogItem> {
        self.items(category).iter().find(|item| item.id == id)
    }

    pub fn contains(&self, category: Category, id: &str) -> bool {
        self.lookup(category, id).is_some()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
