use bounded_buffer::BufferLimits;
use bounded_buffer::memory_safety_demos::{
    run_bounded_copy_loop, run_safe_allocation, run_safe_concatenation, run_safe_copy,
    run_safe_format, run_safe_input,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let limits = BufferLimits::from_env();
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("copy") => run_safe_copy(),
        Some("input") => run_safe_input(&mut std::io::stdin().lock()),
        Some("format") => run_safe_format(),
        Some("concat") => run_safe_concatenation(),
        Some("alloc") => run_safe_allocation(&limits),
        Some("off-by-one") => run_bounded_copy_loop(),
        Some("all") => {
            run_safe_copy();
            run_safe_format();
            run_safe_concatenation();
            run_safe_allocation(&limits);
            run_bounded_copy_loop();
        }
        _ => {
            println!("Usage: cargo run [copy|input|format|concat|alloc|off-by-one|all]");
            println!("copy: bounded strcpy replacement");
            println!("input: bounded gets replacement (reads one line from stdin)");
            println!("format: bounded sprintf replacement");
            println!("concat: bounded strcat replacement");
            println!("alloc: checked malloc(size * 2)");
            println!("off-by-one: bounds-checked copy loop");
            println!("all: every demo except input");
        }
    }
}
