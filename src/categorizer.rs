use crate::models::{Bill, Category, ParsedRow, Transaction};

// Rent-service providers matched before everything else, whatever the amount.
const RENT_PROVIDERS: &[&str] = &["flex finance", "getflex.com"];

// Substrings of a configured bill's *name* that mark it as debt service
// rather than a plain recurring bill.
const DEBT_NAME_HINTS: &[&str] = &["loan", "card", "finance", "chase", "amex", "citi", "synchrony"];

enum Target {
    Fixed(Category),
    /// Category depends on the sign of the amount.
    BySign { inflow: Category, outflow: Category },
}

struct KeywordRule {
    keywords: &'static [&'static str],
    target: Target,
}

// Evaluated top to bottom, first match wins. The order is a behavioral
// contract: a description hitting an earlier set never reaches a later one,
// even when both would match.
const KEYWORD_RULES: &[KeywordRule] = &[
    // Subscriptions and app-store billing
    KeywordRule {
        keywords: &[
            "youtube",
            "google *disney",
            "google *youtube",
            "google play",
            "google storage",
            "google *svcs",
            "disney+",
            "hulu",
            "netflix",
            "spotify",
            "apple.com/bill",
        ],
        target: Target::Fixed(Category::Bills),
    },
    // Entertainment and hobbies
    KeywordRule {
        keywords: &[
            "steam",
            "playstation",
            "xbox",
            "nintendo",
            "game",
            "amc",
            "regal",
            "cinema",
            "movie",
            "ticket",
            "stubhub",
            "seatgeek",
            "eventbrite",
            "golf",
            "bowling",
            "entertainment",
            "hobby",
            "toy",
            "lego",
            "party",
            "club",
            "vape",
            "smoke",
            "dispensary",
        ],
        target: Target::Fixed(Category::ForFun),
    },
    // Loans, cards, and issuers
    KeywordRule {
        keywords: &[
            "loan",
            "payment",
            "credit card",
            "chase",
            "amex",
            "citi",
            "discover",
            "capital one",
            "synchrony",
            "affirm",
        ],
        target: Target::Fixed(Category::Debt),
    },
    // Housing
    KeywordRule {
        keywords: &["rent", "lease", "apartment", "property"],
        target: Target::Fixed(Category::Rent),
    },
    // Restaurants and delivery
    KeywordRule {
        keywords: &[
            "restaurant",
            "cafe",
            "coffee",
            "starbucks",
            "dunkin",
            "mcdonalds",
            "chick-fil-a",
            "burger",
            "taco",
            "chipotle",
            "pizza",
            "eats",
            "doordash",
            "grubhub",
            "uber eats",
            "grill",
            "bistro",
            "steak",
            "bar",
            "dominos",
            "bagel",
            "ny bagel",
            "dd/br",
            "kfc",
            "popeyes",
            "wendy",
            "sonic",
            "subway",
            "jersey mike",
            "panera",
            "sushi",
            "diner",
        ],
        target: Target::Fixed(Category::Dining),
    },
    // Supermarkets, warehouse clubs, pharmacies
    KeywordRule {
        keywords: &[
            "grocery",
            "market",
            "kroger",
            "whole foods",
            "trader joe",
            "publix",
            "heb",
            "harris teeter",
            "wegmans",
            "aldi",
            "lidl",
            "walmart",
            "target",
            "food lion",
            "safeway",
            "bj's",
            "wholesale",
            "sam's club",
            "samsclub",
            "sams club",
            "costco",
            "meijer",
            "walgreens",
            "cvs",
        ],
        target: Target::Fixed(Category::Groceries),
    },
    // Payroll and deposits
    KeywordRule {
        keywords: &["payroll", "deposit", "salary", "elevate"],
        target: Target::Fixed(Category::Income),
    },
    // Peer-to-peer transfers: inflows count as income, outflows are opaque
    KeywordRule {
        keywords: &["venmo", "zelle", "cash app", "paypal"],
        target: Target::BySign {
            inflow: Category::Income,
            outflow: Category::Other,
        },
    },
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Assign exactly one category to a candidate transaction.
pub fn categorize(description: &str, amount: f64, bills: &[Bill]) -> Category {
    let desc = description.to_lowercase();

    if contains_any(&desc, RENT_PROVIDERS) {
        return Category::Rent;
    }

    // A configured bill whose name appears in the description. Whether it
    // lands in Debt or Bills depends on the bill's name, not the description.
    if let Some(bill) = bills.iter().find(|b| desc.contains(&b.name.to_lowercase())) {
        let name = bill.name.to_lowercase();
        if contains_any(&name, DEBT_NAME_HINTS) {
            return Category::Debt;
        }
        return Category::Bills;
    }

    for rule in KEYWORD_RULES {
        if contains_any(&desc, rule.keywords) {
            return match rule.target {
                Target::Fixed(cat) => cat,
                Target::BySign { inflow, outflow } => {
                    if amount > 0.0 {
                        inflow
                    } else {
                        outflow
                    }
                }
            };
        }
    }

    Category::Other
}

/// Promote parsed rows to classified import candidates.
pub fn classify_rows(rows: Vec<ParsedRow>, bills: &[Bill]) -> Vec<Transaction> {
    rows.into_iter()
        .map(|row| {
            let category = categorize(&row.description, row.amount, bills);
            Transaction {
                id: None,
                date: row.date,
                description: row.description,
                amount: row.amount,
                category,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(name: &str) -> Bill {
        Bill {
            id: 1,
            name: name.to_string(),
            amount: 50.0,
            due_day: 1,
        }
    }

    #[test]
    fn test_rent_provider_beats_everything() {
        // "getflex.com" carries a dining keyword-free description, but even a
        // description that also matches dining must classify as Rent.
        assert_eq!(categorize("GETFLEX.COM PAYMENT", -500.0, &[]), Category::Rent);
        assert_eq!(
            categorize("FLEX FINANCE CAFE CHARGE", -37.12, &[]),
            Category::Rent
        );
    }

    #[test]
    fn test_bill_match_splits_debt_from_bills() {
        let bills = vec![bill("Piedmont Health"), bill("Car Loan")];
        assert_eq!(
            categorize("PIEDMONT HEALTH INS PREM", -47.45, &bills),
            Category::Bills
        );
        assert_eq!(
            categorize("ACH WITHDRAWAL CAR LOAN 0921", -169.32, &bills),
            Category::Debt
        );
    }

    #[test]
    fn test_ambiguous_bill_name_is_debt() {
        // The debt hint is read from the configured bill's name, so a bill
        // named "Loan for Bike" drags its matches into Debt.
        let bills = vec![bill("Loan for Bike")];
        assert_eq!(categorize("LOAN FOR BIKE AUTOPAY", -80.0, &bills), Category::Debt);
    }

    #[test]
    fn test_subscription_keywords() {
        assert_eq!(categorize("Netflix.com 866-579-7172", -15.49, &[]), Category::Bills);
        assert_eq!(categorize("APPLE.COM/BILL 866-712-7753", -2.99, &[]), Category::Bills);
    }

    #[test]
    fn test_fun_keywords() {
        assert_eq!(categorize("STEAMGAMES.COM 4259522985", -19.99, &[]), Category::ForFun);
        assert_eq!(categorize("AMC THEATRES #0452", -32.50, &[]), Category::ForFun);
    }

    #[test]
    fn test_debt_keywords() {
        assert_eq!(categorize("CAPITAL ONE MOBILE PMT", -75.0, &[]), Category::Debt);
        assert_eq!(categorize("AFFIRM INC INSTALLMENT", -41.66, &[]), Category::Debt);
    }

    #[test]
    fn test_rent_keywords() {
        assert_eq!(categorize("OAKWOOD APARTMENT HOMES", -1250.0, &[]), Category::Rent);
    }

    #[test]
    fn test_dining_keywords() {
        assert_eq!(
            categorize("STARBUCKS STORE #123", -5.75, &[]),
            Category::Dining
        );
        assert_eq!(categorize("DOORDASH*CHIPOTLE", -18.43, &[]), Category::Dining);
    }

    #[test]
    fn test_grocery_keywords() {
        assert_eq!(categorize("TRADER JOE'S #552", -64.21, &[]), Category::Groceries);
        assert_eq!(categorize("CVS/PHARMACY #04621", -12.99, &[]), Category::Groceries);
    }

    #[test]
    fn test_income_keywords() {
        assert_eq!(categorize("ELEVATE PAYROLL DEP", 1327.36, &[]), Category::Income);
    }

    #[test]
    fn test_p2p_depends_on_sign() {
        assert_eq!(categorize("VENMO CASHOUT", 120.0, &[]), Category::Income);
        assert_eq!(categorize("VENMO PAYMENT 123", -45.0, &[]), Category::Debt); // "payment" hits the debt set first
        assert_eq!(categorize("ZELLE TO ANNA", -45.0, &[]), Category::Other);
    }

    #[test]
    fn test_priority_debt_before_dining() {
        // A restaurant with "loan" in its name lands in Debt. Accepted quirk
        // of priority-first matching, pinned here so nobody "fixes" it.
        assert_eq!(
            categorize("LOAN STAR STEAKHOUSE", -54.30, &[]),
            Category::Debt
        );
    }

    #[test]
    fn test_no_match_is_other() {
        assert_eq!(categorize("MISC 000123", -9.99, &[]), Category::Other);
    }

    #[test]
    fn test_classify_rows_keeps_order() {
        let rows = vec![
            ParsedRow {
                date: "2026-01-15".to_string(),
                description: "STARBUCKS STORE #123".to_string(),
                amount: -5.75,
            },
            ParsedRow {
                date: "2026-01-16".to_string(),
                description: "MISC".to_string(),
                amount: -1.0,
            },
        ];
        let txns = classify_rows(rows, &[]);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].category, Category::Dining);
        assert!(txns[0].id.is_none());
        assert_eq!(txns[1].category, Category::Other);
    }
}
