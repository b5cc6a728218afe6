use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a deterministic products table for trying out rusty-table.
#[derive(Parser, Debug)]
#[command(name = "generate-sample", about)]
struct Args {
    /// Output file; a .parquet/.pq extension writes Parquet, anything else CSV
    #[arg(value_name = "OUTPUT", default_value = "sample_products.csv")]
    output: PathBuf,

    /// Number of rows
    #[arg(long, default_value = "50")]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated product. Prices stay text so a few can be non-numeric.
struct Product {
    id: i64,
    name: String,
    category: &'static str,
    price: String,
    stock: i64,
}

const CATEGORIES: [(&str, f64); 4] = [
    ("tools", 40.0),
    ("garden", 120.0),
    ("electronics", 450.0),
    ("toys", 25.0),
];
const NOUNS: [&str; 6] = ["Widget", "Gadget", "Gizmo", "Sprocket", "Doohickey", "Contraption"];
const ADJECTIVES: [&str; 5] = ["Small", "Large", "Deluxe", "Basic", "Turbo"];
const MISSING_PRICES: [&str; 3] = ["n/a", "", "TBD"];

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Product> {
    (0..rows)
        .map(|i| {
            let (category, mean_price) = CATEGORIES[(rng.next_u64() % CATEGORIES.len() as u64) as usize];
            let name = format!("{} {}", rng.pick(&ADJECTIVES), rng.pick(&NOUNS));

            // Roughly one row in twelve has an unusable price.
            let price = if rng.next_f64() < 1.0 / 12.0 {
                rng.pick(&MISSING_PRICES).to_string()
            } else {
                let p = rng.gauss(mean_price, mean_price * 0.3).max(1.0);
                format!("{:.2}", p)
            };

            Product {
                id: i as i64 + 1,
                name,
                category,
                price,
                stock: (rng.next_u64() % 500) as i64,
            }
        })
        .collect()
}

fn write_csv(path: &Path, products: &[Product]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating output file")?;
    writer.write_record(["id", "name", "category", "price", "stock"])?;
    for p in products {
        writer.write_record([
            p.id.to_string(),
            p.name.clone(),
            p.category.to_string(),
            p.price.clone(),
            p.stock.to_string(),
        ])?;
    }
    writer.flush().context("flushing output file")?;
    Ok(())
}

fn write_parquet(path: &Path, products: &[Product]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("price", DataType::Utf8, false),
        Field::new("stock", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(products.iter().map(|p| p.id))),
            Arc::new(StringArray::from_iter_values(products.iter().map(|p| p.name.as_str()))),
            Arc::new(StringArray::from_iter_values(products.iter().map(|p| p.category))),
            Arc::new(StringArray::from_iter_values(products.iter().map(|p| p.price.as_str()))),
            Arc::new(Int64Array::from_iter_values(products.iter().map(|p| p.stock))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let products = generate(args.rows, &mut rng);

    let is_parquet = matches!(
        args.output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("parquet" | "pq")
    );

    if is_parquet {
        write_parquet(&args.output, &products)?;
    } else {
        write_csv(&args.output, &products)?;
    }

    println!("Wrote {} products to {}", products.len(), args.output.display());
    Ok(())
}
