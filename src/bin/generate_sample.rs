use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

/// Rough outcome model: hard contact in the 8–32° window tends to become a hit.
fn outcome_for(rng: &mut SimpleRng, exit_speed: f64, launch_angle: f64) -> &'static str {
    let sweet_spot = (8.0..=32.0).contains(&launch_angle);
    let hard = exit_speed >= 95.0;
    let roll = rng.next_f64();
    match (sweet_spot, hard) {
        (true, true) if launch_angle > 25.0 && roll < 0.35 => "Home Run",
        (true, true) if roll < 0.55 => "Double",
        (true, true) if roll < 0.62 => "Triple",
        (true, _) if roll < 0.45 => "Single",
        (false, _) if launch_angle < 0.0 && roll < 0.05 => "Fielder's Choice",
        (false, true) if roll < 0.20 => "Single",
        _ => "Out",
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let batters = ["Alvarez, Y", "Betts, M", "Chapman, M", "Diaz, E", "Freeman, F"];
    let pitchers = ["Cole, G", "Webb, L", "Wheeler, Z"];
    let pitch_types = ["Fastball", "Slider", "Curveball", "Changeup", "Cutter"];

    let mut batter_col = Vec::new();
    let mut pitcher_col = Vec::new();
    let mut pitch_type_col = Vec::new();
    let mut inning_col = Vec::new();
    let mut outcome_col = Vec::new();
    let mut speed_col: Vec<Option<f64>> = Vec::new();
    let mut angle_col: Vec<Option<f64>> = Vec::new();

    for _ in 0..600 {
        let exit_speed = rng.gauss(88.0, 12.0).clamp(30.0, 120.0);
        let launch_angle = rng.gauss(12.0, 25.0).clamp(-89.0, 89.0);
        let outcome = outcome_for(&mut rng, exit_speed, launch_angle);

        batter_col.push(rng.pick(&batters));
        pitcher_col.push(rng.pick(&pitchers));
        pitch_type_col.push(rng.pick(&pitch_types));
        inning_col.push((rng.next_u64() % 9 + 1) as i64);
        outcome_col.push(outcome);

        // Tracking drops out now and then.
        let missing = rng.next_f64();
        let speed = (exit_speed * 10.0).round() / 10.0;
        let angle = (launch_angle * 10.0).round() / 10.0;
        speed_col.push((missing >= 0.04).then_some(speed));
        angle_col.push((!(0.02..0.08).contains(&missing)).then_some(angle));
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("PITCHER", DataType::Utf8, false),
        Field::new("BATTER", DataType::Utf8, false),
        Field::new("INNING", DataType::Int64, false),
        Field::new("PITCH_TYPE", DataType::Utf8, false),
        Field::new("PLAY_OUTCOME", DataType::Utf8, false),
        Field::new("EXIT_SPEED", DataType::Float64, true),
        Field::new("LAUNCH_ANGLE", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(pitcher_col)),
            Arc::new(StringArray::from(batter_col)),
            Arc::new(Int64Array::from(inning_col)),
            Arc::new(StringArray::from(pitch_type_col)),
            Arc::new(StringArray::from(outcome_col)),
            Arc::new(Float64Array::from(speed_col)),
            Arc::new(Float64Array::from(angle_col)),
        ],
    )
    .context("building record batch")?;

    let output_path = "sample_batted_balls.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {} batted balls to {output_path}", batch.num_rows());
    Ok(())
}
