//! Placeholder personal data shown next to the real lookup result.

use rand::Rng;
use serde::Serialize;

pub const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William", "Elizabeth",
    "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah", "Charles", "Karen",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez", "Martinez",
    "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson", "Martin",
];

pub const STREET_NAMES: &[&str] = &[
    "Main St", "Oak St", "Pine St", "Maple Ave", "Cedar Ln",
    "Elm St", "Washington Blvd", "Lakeview Dr", "Hillcrest Rd", "Park Ave",
];

/// A made-up identity. Regenerated for every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalMock {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub phone: String,
}

/// New random identity from the thread-local RNG.
pub fn generate_mock() -> PersonalMock {
    generate_mock_with(&mut rand::thread_rng())
}

/// New random identity from `rng`.
pub fn generate_mock_with<R: Rng>(rng: &mut R) -> PersonalMock {
    let first_name = pick(rng, FIRST_NAMES);
    let last_name = pick(rng, LAST_NAMES);

    let email = format!(
        "{}.{}{}@example.com",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        rng.gen_range(0..1000),
    );
    let street = format!("{} {}", rng.gen_range(100..9100), pick(rng, STREET_NAMES));
    let phone = format!("555-{}-{}", rng.gen_range(100..1000), rng.gen_range(1000..10000));

    PersonalMock {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email,
        street,
        phone,
    }
}

fn pick<R: Rng>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}
