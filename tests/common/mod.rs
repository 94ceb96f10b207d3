use rand::Rng;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const EVENT_HEADER: [&str; 8] = [
    "event", "session", "customer", "store", "total", "recurring", "method", "form",
];

/// Generates a scenario of render events, one session per row, with random
/// non-zero totals.
pub fn generate_render_scenario(path: &Path, sessions: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(EVENT_HEADER)?;

    let mut rng = rand::thread_rng();
    for i in 1..=sessions {
        let session = format!("s{i}");
        let customer = i.to_string();
        let total = format!("{}.00", rng.gen_range(1..=500));
        wtr.write_record([
            "render",
            session.as_str(),
            customer.as_str(),
            "1",
            total.as_str(),
            "",
            "",
            "",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
