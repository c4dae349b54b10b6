//! Writes a synthetic launch records table as `spacex_launch_dash.csv` and
//! `spacex_launch_dash.parquet` in the working directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FLIGHTS: usize = 56;
const MAX_PAYLOAD_KG: f64 = 9600.0;

/// Site and its share of launches.
const SITES: [(&str, f64); 4] = [
    ("CCAFS LC-40", 0.46),
    ("CCAFS SLC-40", 0.13),
    ("KSC LC-39A", 0.23),
    ("VAFB SLC-4E", 0.18),
];

/// Booster category, first flight using it, success probability.
const BOOSTERS: [(&str, usize, f64); 5] = [
    ("v1.0", 0, 0.2),
    ("v1.1", 5, 0.35),
    ("FT", 20, 0.7),
    ("B4", 44, 0.8),
    ("B5", 52, 0.9),
];

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick an index according to `weights` (which sum to ~1).
    fn weighted(&mut self, weights: impl Iterator<Item = f64>) -> usize {
        let mut r = self.next_f64();
        let mut last = 0;
        for (i, w) in weights.enumerate() {
            if r < w {
                return i;
            }
            r -= w;
            last = i;
        }
        last
    }
}

struct Launch {
    flight: i64,
    site: &'static str,
    class: i64,
    payload_kg: f64,
    booster_version: String,
    booster_category: &'static str,
}

fn generate(rng: &mut SimpleRng) -> Vec<Launch> {
    (0..FLIGHTS)
        .map(|i| {
            let (category, _, p_success) = BOOSTERS
                .iter()
                .rev()
                .find(|(_, first, _)| i >= *first)
                .copied()
                .unwrap_or(BOOSTERS[0]);
            let site = SITES[rng.weighted(SITES.iter().map(|(_, w)| *w))].0;

            // Heavier payloads as the fleet matures.
            let mean = 1500.0 + 5500.0 * i as f64 / FLIGHTS as f64;
            let payload_kg = (rng.gauss(mean, 1800.0).clamp(0.0, MAX_PAYLOAD_KG) / 10.0).round() * 10.0;

            Launch {
                flight: i as i64 + 1,
                site,
                class: i64::from(rng.next_f64() < p_success),
                payload_kg,
                booster_version: format!("F9 {category}  B{:04}", 1003 + i),
                booster_category: category,
            }
        })
        .collect()
}

fn write_csv(path: &str, launches: &[Launch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "Flight Number",
        "Launch Site",
        "class",
        "Payload Mass (kg)",
        "Booster Version",
        "Booster Version Category",
    ])?;
    for l in launches {
        writer.write_record([
            l.flight.to_string(),
            l.site.to_string(),
            l.class.to_string(),
            l.payload_kg.to_string(),
            l.booster_version.clone(),
            l.booster_category.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, launches: &[Launch]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| l.site))),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter_values(launches.iter().map(|l| l.payload_kg))),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_version.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_category),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let launches = generate(&mut rng);

    write_csv("spacex_launch_dash.csv", &launches)?;
    write_parquet("spacex_launch_dash.parquet", &launches)?;

    let successes = launches.iter().filter(|l| l.class == 1).count();
    println!(
        "Wrote {} launches ({successes} successful) to spacex_launch_dash.csv / .parquet",
        launches.len()
    );
    Ok(())
}
