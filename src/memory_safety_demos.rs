// Bounded rewrites of the classic overflow examples: strcpy, gets, sprintf,
// strcat, malloc(size * 2) and an `i <= 10` copy loop. Each one returns the
// filled buffer or the error that replaced the overflow.

use log::info;

use crate::bounded_string::BoundedString;
use crate::config::BufferLimits;
use crate::error::{BufferError, Result};
use crate::line_source::LineSource;

pub const COPY_CAPACITY: usize = 100;
pub const INPUT_CAPACITY: usize = 64;
pub const LOG_CAPACITY: usize = 128;
pub const CONCAT_CAPACITY: usize = 100;
pub const LOOP_CAPACITY: usize = 10;

/// strcpy(buffer, user_input) with a 100-byte buffer.
pub fn safe_copy(user_input: &[u8]) -> Result<BoundedString> {
    let mut buffer = BoundedString::new(COPY_CAPACITY)?;
    buffer.assign(user_input)?;
    info!("copied: {}", buffer);
    Ok(buffer)
}

/// gets(buffer) with a 64-byte buffer; the read is always capped.
pub fn safe_input<S>(source: &mut S) -> Result<BoundedString>
where
    S: LineSource + ?Sized,
{
    let mut buffer = BoundedString::new(INPUT_CAPACITY)?;
    buffer.read_line(source, INPUT_CAPACITY)?;
    info!("hello, {}!", buffer);
    Ok(buffer)
}

pub fn safe_format(username: &str, action: &str) -> Result<BoundedString> {
    let mut log_buffer = BoundedString::new(LOG_CAPACITY)?;
    log_buffer.format(
        "User {} performed action: {}",
        &[username.into(), action.into()],
    )?;
    info!("{}", log_buffer);
    Ok(log_buffer)
}

pub fn safe_concatenation(first: &[u8], second: &[u8], third: &[u8]) -> Result<BoundedString> {
    let mut result = BoundedString::new(CONCAT_CAPACITY)?;
    result.assign(first)?;
    result.append(second)?;
    result.append(third)?;
    info!("result: {}", result);
    Ok(result)
}

/// malloc(size * 2) followed by a copy, with the multiplication checked
/// against `limits` before allocating.
pub fn safe_allocation(size: u32, data: &[u8], limits: &BufferLimits) -> Result<BoundedString> {
    let mut buffer = BoundedString::with_scaled_capacity(size as usize, 2, limits)?;
    buffer.assign(data)?;
    info!("data: {}", buffer);
    Ok(buffer)
}

/// Byte-by-byte copy into a 10-byte buffer, stopping at NUL or end of input.
///
/// The loop runs while `i < capacity`. Input that still has bytes left at
/// that point is rejected instead of spilling one past the end.
pub fn bounded_copy_loop(input: &[u8]) -> Result<BoundedString> {
    let mut buffer = BoundedString::new(LOOP_CAPACITY)?;
    let content_len = input.iter().position(|&b| b == 0).unwrap_or(input.len());

    if content_len > buffer.capacity() {
        return Err(BufferError::Truncated {
            required: content_len,
            capacity: buffer.capacity(),
        });
    }

    let mut i = 0;
    while i < buffer.capacity() && i < content_len {
        buffer.indexed_write(i, input[i])?;
        i += 1;
    }
    Ok(buffer)
}

fn report(label: &str, outcome: Result<BoundedString>) {
    match outcome {
        Ok(buffer) => println!("{}: ok ({} bytes) {:?}", label, buffer.len(), buffer.to_string()),
        Err(e) => println!("{}: rejected: {}", label, e),
    }
}

pub fn run_safe_copy() {
    println!("=== Bounded Copy (strcpy) ===");
    report("short input", safe_copy(b"hello"));
    report("200-byte input", safe_copy(&[b'A'; 200]));
}

pub fn run_safe_input<S>(source: &mut S)
where
    S: LineSource + ?Sized,
{
    println!("=== Bounded Line Read (gets) ===");
    println!("Enter your name: ");
    report("line", safe_input(source));
}

pub fn run_safe_format() {
    println!("=== Bounded Format (sprintf) ===");
    report("normal", safe_format("alice", "login"));
    report("directives in data", safe_format("%s%s%n", "{}"));
    let long_name = "x".repeat(120);
    report("long username", safe_format(&long_name, "login"));
}

pub fn run_safe_concatenation() {
    println!("=== Bounded Concatenation (strcat) ===");
    report("fits", safe_concatenation(b"foo", b"bar", b"baz"));
    report("overflow", safe_concatenation(&[b'a'; 40], &[b'b'; 40], &[b'c'; 40]));
}

pub fn run_safe_allocation(limits: &BufferLimits) {
    println!("=== Checked Allocation (malloc(size * 2)) ===");
    report("size 16", safe_allocation(16, b"payload", limits));
    report("size u32::MAX", safe_allocation(u32::MAX, b"payload", limits));
    report("data larger than buffer", safe_allocation(2, b"payload", limits));
}

pub fn run_bounded_copy_loop() {
    println!("=== Bounded Copy Loop (off-by-one) ===");
    report("9 bytes", bounded_copy_loop(b"123456789"));
    report("10 bytes", bounded_copy_loop(b"1234567890"));
    report("11 bytes", bounded_copy_loop(b"12345678901"));
    report("NUL inside", bounded_copy_loop(b"abc\0defghijklmnop"));
}
