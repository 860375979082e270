//! Writes `sample_claims.csv`, a raw export in the standard layout with the
//! usual dirt: non-ready statuses, repeated claim numbers, mixed and broken
//! treatment dates, blank and `NaN` room options.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};

const HEADER: [&str; 25] = [
    "Claim Status",
    "Policy No",
    "Client Name",
    "Claim No",
    "Member No",
    "Emp ID",
    "Emp Name",
    "Patient Name",
    "Membership",
    "Product Type",
    "Claim Type",
    "Room Option",
    "Area",
    "Primary Diagnosis",
    "Treatment Place",
    "Treatment Start",
    "Treatment Finish",
    "Date",
    "Claim Paid Note Amount",
    "Billed",
    "Accepted",
    "Excess Coy",
    "Excess Emp",
    "Excess Total",
    "Unpaid",
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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

/// Treatment dates come out of several upstream systems.
fn format_start(date: NaiveDate, style: u64) -> String {
    match style {
        0 => date.format("%Y-%m-%d").to_string(),
        1 => date.format("%m/%d/%Y").to_string(),
        2 => date.format("%-d %b %Y").to_string(),
        _ => date.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let clients = ["pt sinar jaya", "PT Maju Bersama", "cv karya utama"];
    let patients = ["budi santoso", "siti rahma", "Agus Salim", "dewi lestari", "rina wati"];
    let memberships = ["EMP", "SPO", "CHI"];
    let products = ["IP", "OP", "MA", "DE"];
    let claim_types = ["CASHLESS", "REIMBURSE"];
    let rooms = [" on plan ", "VIP", "kelas 1", "", " ", "NaN", "None"];
    let areas = ["Jakarta", "Bandung", "Surabaya"];
    let diagnoses = ["dengue fever", "typhoid", "acute bronchitis", "gastritis"];
    let places = ["rs medika", "RS Harapan", "klinik sehat"];
    let statuses = ["R", "R", "R", "R", "P", "D"];

    let base = NaiveDate::from_ymd_opt(2024, 1, 1).context("base date")?;
    let output_path = "sample_claims.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let mut rows = 0usize;
    for i in 0..120u64 {
        // Every tenth row re-submits an earlier claim with new amounts.
        let claim_no = if i > 0 && i % 10 == 0 {
            100_000 + rng.below(i)
        } else {
            100_000 + i
        };
        let start = base + Duration::days(rng.below(360) as i64);
        let finish = start + Duration::days(rng.below(6) as i64);
        let start_text = if rng.below(40) == 0 {
            "unknown".to_string()
        } else {
            format_start(start, rng.below(4))
        };
        let billed = 250_000 + rng.below(20) * 125_000;
        let excess_coy = rng.below(3) * 25_000;
        let excess_emp = rng.below(2) * 50_000;
        let excess_total = excess_coy + excess_emp;
        let accepted = billed - excess_total;
        let unpaid = if rng.below(8) == 0 { 50_000 } else { 0 };
        let member = 5_000 + rng.below(40);

        let record = [
            rng.pick(&statuses).to_string(),
            format!("POL-{:04}", 1 + rng.below(3)),
            rng.pick(&clients).to_string(),
            claim_no.to_string(),
            format!("{member:07}"),
            format!("E{member}"),
            rng.pick(&patients).to_string(),
            rng.pick(&patients).to_string(),
            rng.pick(&memberships).to_string(),
            rng.pick(&products).to_string(),
            rng.pick(&claim_types).to_string(),
            rng.pick(&rooms).to_string(),
            rng.pick(&areas).to_string(),
            rng.pick(&diagnoses).to_string(),
            rng.pick(&places).to_string(),
            start_text,
            finish.format("%Y-%m-%d").to_string(),
            format!("{:02}/{:02}/{}", finish.day(), finish.month(), finish.year()),
            (accepted - unpaid).to_string(),
            billed.to_string(),
            accepted.to_string(),
            excess_coy.to_string(),
            excess_emp.to_string(),
            excess_total.to_string(),
            unpaid.to_string(),
        ];
        writer.write_record(&record)?;
        rows += 1;
    }
    writer.flush()?;

    println!("Wrote {rows} raw claim rows to {output_path}");
    Ok(())
}
