//! Generate a directory of synthetic fit-report files plus a matching
//! parameter list, so the aggregator can be tried without the fitting tool.

use std::fs;
use std::path::Path;

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
}

/// Fixed-offset report layout: the weighted residual is the last token of
/// line 11 and the refined-variables block runs from line 15 down to two
/// lines above the divider.
fn report_text(stem: &str, rw: f64, chi2: f64, params: &[(&str, f64)]) -> String {
    let mut lines: Vec<String> = vec![
        "Results written: synthetic sample data".to_string(),
        "produced by fitres generate_sample".to_string(),
        String::new(),
        format!("Summary of fit for {stem}"),
        String::new(),
        "Some quantities invariant under unit change:".to_string(),
        String::new(),
        "Overall quality:".to_string(),
        format!("Residual        {:.6}", chi2 / 2.0),
        format!("Contribution    {:.6}", chi2 / 2.0),
        "Restraints      0.000000".to_string(),
        format!("Rw              {rw:.6}"),
        format!("Chi2            {chi2:.6}"),
        String::new(),
        "Refined variables:".to_string(),
    ];
    for (name, value) in params {
        lines.push(format!("{name:<12} {value:.6e} +/- {:.1e}", value.abs() * 1e-3));
    }
    lines.push(String::new());
    lines.push("Fixed variables: none".to_string());
    lines.push("-".repeat(78));
    lines.push(String::new());
    lines.join("\n")
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let out_dir = Path::new("sample_reports");
    fs::create_dir_all(out_dir).expect("Failed to create output directory");

    // Base refined values for a two-phase nickel fit; each sample gets a
    // small jitter around them.
    let base: &[(&str, f64, f64)] = &[
        ("scale", 0.45, 0.02),
        ("delta2", 2.20, 0.10),
        ("a_Ni", 3.524, 0.002),
        ("Uiso_Ni", 0.0055, 0.0004),
        ("a_NiO", 4.177, 0.003),
        ("Uiso_NiO", 0.0060, 0.0005),
        ("psize", 42.0, 3.0),
    ];

    let n_samples = 12;
    for i in 0..n_samples {
        let stem = format!("sample_{i:02}");

        let mut params: Vec<(&str, f64)> = Vec::new();
        for &(name, mean, std_dev) in base {
            // Odd samples lack the particle-size parameter, so the
            // aggregated table gets NaN cells to look at.
            if name == "psize" && i % 2 == 1 {
                continue;
            }
            params.push((name, rng.gauss(mean, std_dev)));
        }

        let rw = 0.05 + 0.10 * rng.next_f64();
        let chi2 = rng.gauss(120.0, 15.0).abs();

        let path = out_dir.join(format!("{stem}.res"));
        fs::write(&path, report_text(&stem, rw, chi2, &params))
            .expect("Failed to write report file");
    }

    // Matching parameter list; rw is folded into every report's mapping.
    let mut names: Vec<&str> = base.iter().map(|&(name, _, _)| name).collect();
    names.push("rw");
    let list_path = out_dir.join("parameters.csv");
    fs::write(&list_path, names.join(",")).expect("Failed to write parameter list");

    println!(
        "Wrote {n_samples} reports and {} to {}",
        list_path.display(),
        out_dir.display()
    );
}
