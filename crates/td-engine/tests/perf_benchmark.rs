use std::time::Instant;
use td_core::Program;
use td_engine::Interpreter;

#[test]
#[ignore] // Run manually with `cargo test --test perf_benchmark -- --nocapture --ignored`
fn benchmark_parse_and_run() {
    let mut source = String::from("*:1024,1024,white\n*:black,1\n");
    // A dense zig-zag of 100,000 strokes with shapes sprinkled in
    for i in 0..100_000 {
        let color = format!("#{:06X}", i * 97 % 0xFF_FFFF);
        match i % 4 {
            0 => source.push_str(&format!("forward:{},,2,{color}\n", i % 300)),
            1 => source.push_str(&format!("right:{}\n", i % 200)),
            2 => source.push_str(&format!("backward:{},3\n", i % 300)),
            _ => source.push_str(&format!("circle:{},{color}\nleft:{}\n", i % 40, i % 200)),
        }
    }

    let start = Instant::now();
    let program = Program::from_source(&source).expect("parse failed");
    let parsed = start.elapsed();
    let canvas = Interpreter::run(&program).expect("run failed");
    let total = start.elapsed();

    println!(
        "Parsed {} instructions in {:?}, ran in {:?} ({} painted pixels)",
        program.len(),
        parsed,
        total - parsed,
        canvas.painted_pixels()
    );
}
