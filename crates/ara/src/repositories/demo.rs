//! 🎪 The demo project: a tiny e-shop that sells useless products, by pigeon if needed.
//!
//! Handy for trying the CLI without a dataset file (`store = "Demo"`), and for
//! tests that want something more lifelike than three functionalities named "A".

use crate::common::{Country, Functionality, FunctionalitySeverity, FunctionalityType, Scenario, Team};
use crate::repositories::Dataset;

/// 🏷️ The project id every demo row belongs to.
pub const DEMO_PROJECT_ID: i64 = 1;

const ALL_COUNTRY_CODES: &str = "fr,us";

const MARKETING: i64 = 1;
const CATALOG: i64 = 2;
const BUY: i64 = 3;
const ACCOUNT: i64 = 4;
const INFRASTRUCTURE: i64 = 5;

fn team(id: i64, name: &str, assignable_to_functionalities: bool) -> Team {
    Team {
        id,
        project_id: DEMO_PROJECT_ID,
        name: name.to_string(),
        assigned_to_problems: true,
        assignable_to_functionalities,
    }
}

fn folder(id: i64, parent_id: Option<i64>, name: &str) -> Functionality {
    Functionality {
        parent_id,
        kind: FunctionalityType::Folder,
        ..Functionality::new(id, DEMO_PROJECT_ID, name)
    }
}

fn leaf(
    id: i64,
    parent_id: i64,
    name: &str,
    country_codes: &str,
    team_id: i64,
    severity: FunctionalitySeverity,
) -> Functionality {
    Functionality {
        parent_id: Some(parent_id),
        country_codes: Some(country_codes.to_string()),
        team_id: Some(team_id),
        severity: Some(severity),
        ..Functionality::new(id, DEMO_PROJECT_ID, name)
    }
}

fn scenarios(ids_and_ignored: &[(i64, bool)]) -> Vec<Scenario> {
    ids_and_ignored
        .iter()
        .map(|&(id, ignored)| Scenario {
            id,
            name: format!("Demo scenario {id}"),
            ignored,
        })
        .collect()
}

/// 📦 Build the demo dataset. Fresh copy every call, mutate it all you like.
pub fn demo_dataset() -> Dataset {
    use FunctionalitySeverity::{High, Low, Medium};

    let mut functionalities = vec![
        folder(10, None, "Choose a product"),
        Functionality {
            scenarios: scenarios(&[(1, false), (2, false)]),
            ..leaf(11, 10, "List all our useless products", ALL_COUNTRY_CODES, CATALOG, High)
        },
        Functionality {
            scenarios: scenarios(&[(3, false), (4, true)]),
            ..leaf(12, 10, "Show a product with irresistible details", ALL_COUNTRY_CODES, CATALOG, Medium)
        },
        Functionality {
            scenarios: scenarios(&[(5, true)]),
            ..leaf(13, 10, "Sales Price on product details page", ALL_COUNTRY_CODES, MARKETING, Medium)
        },
        folder(20, None, "Buy a product"),
        Functionality {
            scenarios: scenarios(&[(6, false)]),
            ..leaf(21, 20, "Add a product to cart", ALL_COUNTRY_CODES, BUY, High)
        },
        Functionality {
            scenarios: scenarios(&[(7, false)]),
            ..leaf(22, 20, "Show cart", ALL_COUNTRY_CODES, BUY, High)
        },
        folder(30, Some(20), "Delivery"),
        leaf(31, 30, "Choose delivery option", ALL_COUNTRY_CODES, BUY, High),
        leaf(32, 30, "By pigeon", "fr", BUY, High),
        Functionality {
            started: Some(true),
            ..leaf(33, 30, "By 3D Printing", "us", BUY, Low)
        },
        Functionality {
            not_automatable: Some(true),
            ..leaf(34, 30, "By drone air-drop", ALL_COUNTRY_CODES, BUY, Medium)
        },
        folder(40, None, "Your account"),
        Functionality {
            scenarios: scenarios(&[(8, false)]),
            ..leaf(41, 40, "Log in", ALL_COUNTRY_CODES, ACCOUNT, High)
        },
    ];

    // -- 🧹 one orphan with no team, no severity, no country: the "we'll sort it out later" row
    functionalities.push(Functionality {
        parent_id: Some(40),
        ..Functionality::new(42, DEMO_PROJECT_ID, "Delete my account")
    });

    Dataset {
        countries: vec![
            Country {
                project_id: DEMO_PROJECT_ID,
                code: "fr".to_string(),
                name: "France".to_string(),
            },
            Country {
                project_id: DEMO_PROJECT_ID,
                code: "us".to_string(),
                name: "United States".to_string(),
            },
        ],
        teams: vec![
            team(MARKETING, "Marketing", true),
            team(CATALOG, "Catalog", true),
            team(BUY, "Buy", true),
            team(ACCOUNT, "Account", true),
            team(INFRASTRUCTURE, "Infrastructure", false),
        ],
        functionalities,
    }
}
