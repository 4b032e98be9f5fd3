//! Writes a synthetic `data/titanic.csv.gz` with the manifest's columns so
//! the explorer can run without the original dataset.

use std::fs::File;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const SURNAMES: [&str; 12] = [
    "Andersson", "Sage", "Johnson", "Goodwin", "Carter", "Panula", "Skoog", "Rice", "Brown",
    "Smith", "Kelly", "Harris",
];
const MALE_NAMES: [&str; 8] = [
    "John", "William", "Thomas", "Charles", "George", "James", "Edward", "Frederick",
];
const FEMALE_NAMES: [&str; 8] = [
    "Mary", "Anna", "Elizabeth", "Margaret", "Ellen", "Alice", "Helen", "Emily",
];

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = Path::new("data/titanic.csv.gz");
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let encoder = GzEncoder::new(File::create(output_path)?, Compression::default());
    let mut writer = csv::Writer::from_writer(encoder);
    writer.write_record([
        "PassengerId", "Survived", "Pclass", "Name", "Sex", "Age", "SibSp", "Parch", "Ticket",
        "Fare", "Cabin", "Embarked",
    ])?;

    let n_rows = 891;
    for id in 1..=n_rows {
        let pclass: u8 = match rng.next_f64() {
            p if p < 0.24 => 1,
            p if p < 0.45 => 2,
            _ => 3,
        };
        let male = rng.chance(0.65);
        let child = rng.chance(0.08);

        let title = match (male, child) {
            _ if id == 746 => "Capt",
            (true, true) => "Master",
            (true, false) if rng.chance(0.02) => "Dr",
            (true, false) => "Mr",
            (false, _) if rng.chance(0.45) => "Mrs",
            (false, _) => "Miss",
        };
        let male = male || title == "Capt";
        let given = if male {
            rng.pick(&MALE_NAMES)
        } else {
            rng.pick(&FEMALE_NAMES)
        };
        let name = format!("{}, {title}. {given}", rng.pick(&SURNAMES));

        let age = if child {
            rng.next_f64() * 12.0
        } else {
            rng.gauss(31.0 + 6.0 * (3 - pclass) as f64, 11.0).clamp(14.0, 80.0)
        };
        // Infant ages keep their fraction, as in the manifest.
        let age_field = match () {
            _ if rng.chance(0.2) => String::new(),
            _ if age < 1.0 => format!("{:.2}", age.max(0.42)),
            _ => format!("{}", age.round()),
        };

        let base_fare = match pclass {
            1 => 84.0,
            2 => 20.0,
            _ => 13.0,
        };
        let fare = (base_fare * (0.3 + rng.next_f64() * 1.7)).max(0.0);
        let fare = if pclass == 1 && rng.chance(0.01) {
            512.3292
        } else {
            fare
        };

        let p_survive = match (male, pclass) {
            (false, 1) => 0.97,
            (false, 2) => 0.92,
            (false, _) => 0.5,
            (true, 1) => 0.37,
            (true, 2) => 0.16,
            (true, _) => 0.14,
        };
        let survived = rng.chance(if child { 0.6 } else { p_survive });

        let embarked = match rng.next_f64() {
            p if p < 0.003 => "",
            p if p < 0.19 => "C",
            p if p < 0.28 => "Q",
            _ => "S",
        };
        let cabin = if pclass == 1 {
            format!("{}{}", rng.pick(&["A", "B", "C", "D", "E"]), rng.next_u64() % 120)
        } else {
            String::new()
        };

        writer.write_record([
            id.to_string(),
            u8::from(survived).to_string(),
            pclass.to_string(),
            name,
            if male { "male" } else { "female" }.to_string(),
            age_field,
            (rng.next_u64() % 3).to_string(),
            (rng.next_u64() % 3).to_string(),
            format!("{}", 100000 + rng.next_u64() % 300000),
            format!("{fare:.4}"),
            cabin,
            embarked.to_string(),
        ])?;
    }

    writer.into_inner()?.finish()?;
    println!("Wrote {n_rows} passengers to {}", output_path.display());
    Ok(())
}
