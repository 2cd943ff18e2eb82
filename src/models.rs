/// Fixed spending-category set. Stored in the database by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Rent,
    Bills,
    Debt,
    ForFun,
    Dining,
    Groceries,
    Income,
    Other,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Rent,
        Category::Bills,
        Category::Debt,
        Category::ForFun,
        Category::Dining,
        Category::Groceries,
        Category::Income,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Rent => "Rent",
            Category::Bills => "Bills",
            Category::Debt => "Debt",
            Category::ForFun => "For Fun",
            Category::Dining => "Dining",
            Category::Groceries => "Groceries",
            Category::Income => "Income",
            Category::Other => "Other",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
            .copied()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A ledger entry, or an import candidate when `id` is None.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: Category,
}

/// A recurring bill. Consulted read-only by the categorizer.
#[derive(Debug, Clone)]
pub struct Bill {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub due_day: u32,
}

/// Intermediate representation from the statement parser, pre-classification.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub date: String,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub filename: String,
    pub record_count: i64,
    pub date_range_start: Option<String>,
    pub date_range_end: Option<String>,
    pub checksum: String,
}
