use std::collections::HashMap;

use crate::ast::{Channel, OutputStmt, Stmt};
use crate::eval::{eval, Env, PixelAccess, Value};
use crate::parser::{parse_expr, split_statements};

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

/// A fully parsed effect equation: constants bound by `deff`/`defi`, user
/// functions bound by `defn`, and the output-assignment lines run once per
/// pixel. Parsing never fails — unrecognized top-level lines are dropped
/// (spec.md §4.6, §7).
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub constants: HashMap<String, Value>,
    pub functions: HashMap<String, Function>,
    pub output_lines: Vec<OutputStmt>,
}

impl Program {
    pub fn parse(equation: &str) -> Program {
        let mut program = Program::default();
        for stmt in split_statements(equation) {
            if let Some(rest) = stmt.strip_prefix("deff ") {
                if let Some((name, value)) = split_name_value(rest) {
                    if let Ok(v) = value.parse::<f64>() {
                        program.constants.insert(name.to_string(), Value::Float(v));
                    }
                }
            } else if let Some(rest) = stmt.strip_prefix("defi ") {
                if let Some((name, value)) = split_name_value(rest) {
                    if let Ok(v) = value.parse::<i64>() {
                        program.constants.insert(name.to_string(), Value::Int(v));
                    }
                }
            } else if let Some(rest) = stmt.strip_prefix("defn ") {
                if let Some((name, func)) = parse_function_def(rest) {
                    program.functions.insert(name, func);
                }
            } else if let Some(output) = parse_output_stmt(&stmt) {
                program.output_lines.push(output);
            } else {
                tracing::debug!(line = %stmt, "pixel effect: unrecognized top-level statement, skipping");
            }
        }
        program
    }
}

fn split_name_value(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.trim();
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next()?;
    let value = parts.next()?.trim();
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name, value))
}

fn parse_function_def(rest: &str) -> Option<(String, Function)> {
    let paren_open = rest.find('(')?;
    let name = rest[..paren_open].trim().to_string();
    let paren_close = rest[paren_open..].find(')')? + paren_open;
    let params: Vec<String> = rest[paren_open + 1..paren_close]
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let brace_open = rest[paren_close..].find('{')? + paren_close;
    let brace_close = rest.rfind('}')?;
    if brace_close <= brace_open {
        return None;
    }
    let body_src = &rest[brace_open + 1..brace_close];
    let body = parse_func_body(body_src);
    Some((name, Function { params, body }))
}

fn parse_func_body(body: &str) -> Vec<Stmt> {
    let mut out = Vec::new();
    for line in split_statements(body) {
        if let Some(stmt) = parse_func_stmt(&line) {
            out.push(stmt);
        }
    }
    out
}

fn parse_func_stmt(line: &str) -> Option<Stmt> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix("return") {
        let rest = rest.trim();
        return parse_expr(rest).map(Stmt::Return);
    }
    if let Some(rest) = line.strip_prefix("for") {
        return parse_for_stmt(rest.trim());
    }
    if let Some(pos) = line.find(" += ") {
        let (target, rhs) = line.split_at(pos);
        let rhs = &rhs[" += ".len()..];
        return parse_expr(rhs).map(|e| Stmt::AddAssign(target.trim().to_string(), e));
    }
    if let Some(target) = line.strip_suffix("++") {
        return Some(Stmt::Increment(target.trim().to_string()));
    }
    if let Some(pos) = line.find(" = ") {
        let (target, rhs) = line.split_at(pos);
        // A declaration like `int sample_x = ...` keeps only the identifier.
        let target = target.trim().rsplit(' ').next().unwrap_or(target.trim());
        let rhs = &rhs[" = ".len()..];
        return parse_expr(rhs).map(|e| Stmt::Assign(target.to_string(), e));
    }
    None
}

/// `for (int VAR = FROM; VAR <= TO; VAR++) { BODY }` — the only recognized
/// loop form (spec.md §4.6); anything else is a no-op.
fn parse_for_stmt(rest: &str) -> Option<Stmt> {
    let rest = rest.strip_prefix('(')?;
    let header_end = rest.find(')')?;
    let header = &rest[..header_end];
    let body_start = rest[header_end..].find('{')? + header_end + 1;
    let body_end = rest.rfind('}')?;
    if body_end <= body_start {
        return None;
    }
    let body_src = &rest[body_start..body_end];

    let mut clauses = header.split(';');
    let init = clauses.next()?.trim();
    let cond = clauses.next()?.trim();
    let _step = clauses.next()?.trim();

    let init = init.strip_prefix("int")?.trim();
    let (var, from_src) = init.split_once('=')?;
    let var = var.trim().to_string();
    let from = parse_expr(from_src.trim())?;

    let cond = cond.strip_prefix(&var)?.trim();
    let to_src = cond.strip_prefix("<=")?.trim();
    let to = parse_expr(to_src)?;

    let body = parse_func_body(body_src);
    Some(Stmt::For { var, from, to, body })
}

fn parse_output_stmt(line: &str) -> Option<OutputStmt> {
    if let Some(rest) = line.strip_prefix("chunk4*:[r, g, b, a]") {
        let rest = rest.trim().strip_prefix('=')?.trim();
        return parse_expr(rest).map(OutputStmt::Chunk4);
    }
    for (prefix, channel) in [("r", Channel::R), ("g", Channel::G), ("b", Channel::B), ("a", Channel::A)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            let rest = rest.trim_start();
            if let Some(rest) = rest.strip_prefix('=') {
                // guard against matching an identifier that merely starts with r/g/b/a
                if !line[..prefix.len()].chars().next().map(|c| c.is_alphanumeric()).unwrap_or(false)
                    || line.as_bytes().get(prefix.len()).map(|b| b.is_ascii_whitespace() || *b == b'=').unwrap_or(true)
                {
                    return parse_expr(rest.trim()).map(|e| OutputStmt::Channel(channel, e));
                }
            }
        }
    }
    None
}

pub fn call_user_function(
    func: &Function,
    args: &[Value],
    env: &mut Env,
    pixels: &PixelAccess,
    functions: &HashMap<String, Function>,
) -> Value {
    for (param, arg) in func.params.iter().zip(args.iter()) {
        env.set(param, arg.clone());
    }
    exec_block(&func.body, env, pixels, functions).unwrap_or(Value::Int(0))
}

/// Executes a statement block, returning `Some(value)` as soon as a
/// `return` is hit (mirrors the reference interpreter breaking out of its
/// line loop on the first `return`).
fn exec_block(
    stmts: &[Stmt],
    env: &mut Env,
    pixels: &PixelAccess,
    functions: &HashMap<String, Function>,
) -> Option<Value> {
    for stmt in stmts {
        match stmt {
            Stmt::Return(expr) => return Some(eval(expr, env, pixels, functions)),
            Stmt::Assign(name, expr) => {
                let v = eval(expr, env, pixels, functions);
                env.set(name, v);
            }
            Stmt::AddAssign(name, expr) => {
                let delta = eval(expr, env, pixels, functions);
                let current = env.get(name);
                let updated = match (current, delta) {
                    (Value::Int(a), Value::Int(b)) => Value::Int(a + b),
                    (a, b) => Value::Float(a.as_f64() + b.as_f64()),
                };
                env.set(name, updated);
            }
            Stmt::Increment(name) => {
                let current = env.get(name);
                let updated = match current {
                    Value::Int(i) => Value::Int(i + 1),
                    other => Value::Float(other.as_f64() + 1.0),
                };
                env.set(name, updated);
            }
            Stmt::For { var, from, to, body } => {
                let start = eval(from, env, pixels, functions).as_f64().floor() as i64;
                let end = eval(to, env, pixels, functions).as_f64().floor() as i64;
                let mut i = start;
                while i <= end {
                    env.set(var, Value::Int(i));
                    if let Some(v) = exec_block(body, env, pixels, functions) {
                        return Some(v);
                    }
                    i = match env.get(var) {
                        Value::Int(n) => n + 1,
                        other => other.as_f64().floor() as i64 + 1,
                    };
                }
            }
        }
    }
    None
}

/// Executes `program` once per pixel of `pixels` (RGBA8, `width*height*4`
/// bytes), reading and writing in place. `time_seconds` binds `time`.
pub fn run_pixel_effect(pixels: &mut [u8], width: u32, height: u32, program: &Program, time_seconds: f64) {
    if pixels.len() != (width as usize) * (height as usize) * 4 {
        tracing::warn!(
            expected = (width as usize) * (height as usize) * 4,
            got = pixels.len(),
            "pixel effect: buffer size mismatch, skipping"
        );
        return;
    }

    let snapshot = pixels.to_vec();
    let access = PixelAccess { pixels: &snapshot };

    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 4) as usize;
            let mut env = Env::new();
            for (name, value) in &program.constants {
                env.set(name, value.clone());
            }
            env.set("x", Value::Int(x as i64));
            env.set("y", Value::Int(y as i64));
            env.set("width", Value::Int(width as i64));
            env.set("height", Value::Int(height as i64));
            env.set("time", Value::Float(time_seconds));
            env.set("pi", Value::Float(std::f64::consts::PI));
            env.set("r", Value::Float(snapshot[idx] as f64));
            env.set("g", Value::Float(snapshot[idx + 1] as f64));
            env.set("b", Value::Float(snapshot[idx + 2] as f64));
            env.set("a", Value::Float(snapshot[idx + 3] as f64));

            for stmt in &program.output_lines {
                match stmt {
                    OutputStmt::Channel(channel, expr) => {
                        let v = eval(expr, &mut env, &access, &program.functions).as_f64();
                        let byte = v.clamp(0.0, 255.0) as u8;
                        match channel {
                            Channel::R => pixels[idx] = byte,
                            Channel::G => pixels[idx + 1] = byte,
                            Channel::B => pixels[idx + 2] = byte,
                            Channel::A => pixels[idx + 3] = byte,
                        }
                        // keep subsequent lines in this pixel able to see
                        // the newly assigned channel value.
                        env.set(
                            match channel {
                                Channel::R => "r",
                                Channel::G => "g",
                                Channel::B => "b",
                                Channel::A => "a",
                            },
                            Value::Float(byte as f64),
                        );
                    }
                    OutputStmt::Chunk4(expr) => {
                        let v = eval(expr, &mut env, &access, &program.functions);
                        if let Some(arr) = v.as_array() {
                            if arr.len() >= 4 {
                                pixels[idx] = arr[0].clamp(0.0, 255.0) as u8;
                                pixels[idx + 1] = arr[1].clamp(0.0, 255.0) as u8;
                                pixels[idx + 2] = arr[2].clamp(0.0, 255.0) as u8;
                                pixels[idx + 3] = arr[3].clamp(0.0, 255.0) as u8;
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_equation_leaves_pixels_unchanged() {
        let program = Program::parse("r = r; g = g; b = b; a = a");
        let mut pixels = vec![10u8, 20, 30, 40, 50, 60, 70, 80];
        let before = pixels.clone();
        run_pixel_effect(&mut pixels, 2, 1, &program, 0.0);
        assert_eq!(pixels, before);
    }

    #[test]
    fn determinism_scenario_from_spec() {
        let program = Program::parse("r = (x + y) % 256; g = 0; b = 0; a = 255");
        let mut pixels = vec![0u8; 3 * 2 * 4];
        run_pixel_effect(&mut pixels, 3, 2, &program, 0.0);
        let expected_r = [0, 1, 2, 1, 2, 3];
        for (i, &exp) in expected_r.iter().enumerate() {
            assert_eq!(pixels[i * 4], exp, "pixel {i}");
            assert_eq!(pixels[i * 4 + 1], 0);
            assert_eq!(pixels[i * 4 + 2], 0);
            assert_eq!(pixels[i * 4 + 3], 255);
        }
    }

    #[test]
    fn unknown_function_no_ops_to_zero_rather_than_panicking() {
        let program = Program::parse("r = nonexistent(1, 2)");
        let mut pixels = vec![100u8; 4];
        run_pixel_effect(&mut pixels, 1, 1, &program, 0.0);
        assert_eq!(pixels[0], 0);
    }

    #[test]
    fn user_function_with_for_loop_and_add_assign() {
        let eq = "defn total(n) { sum = 0; for (int i = 0; i <= n; i++) { sum += i; } return sum; }\nr = total(3)";
        let program = Program::parse(eq);
        let mut pixels = vec![0u8; 4];
        run_pixel_effect(&mut pixels, 1, 1, &program, 0.0);
        assert_eq!(pixels[0], 6); // 0+1+2+3
    }

    #[test]
    fn deff_constant_is_visible_in_output_line() {
        let program = Program::parse("deff k 2.0\nr = k * 10");
        let mut pixels = vec![0u8; 4];
        run_pixel_effect(&mut pixels, 1, 1, &program, 0.0);
        assert_eq!(pixels[0], 20);
    }
}
