use std::collections::HashMap;

use crate::ast::{BinOp, Expr};
use crate::program::Function;

/// A typed runtime value. Scalars are int or float; arrays are fixed-length
/// float vectors (spec.md §4.6 "Typed values").
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Array(Vec<f64>),
}

impl Value {
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Array(a) => a.first().copied().unwrap_or(0.0),
        }
    }

    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

/// The per-pixel environment: built-in bindings plus whatever `deff`/`defi`
/// constants and local function-body assignments are in scope. Matches the
/// reference interpreter's single flat, global variable table — user
/// function calls are not stack-scoped (spec.md's interpreter is
/// deliberately minimal; see DESIGN.md).
#[derive(Clone, Debug, Default)]
pub struct Env {
    vars: HashMap<String, Value>,
}

impl Env {
    pub fn new() -> Self {
        Env::default()
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Value {
        self.vars.get(name).cloned().unwrap_or(Value::Int(0))
    }
}

/// Read-only pixel-local context: raw buffer access for `pixels[i]`.
pub struct PixelAccess<'a> {
    pub pixels: &'a [u8],
}

pub fn eval(
    expr: &Expr,
    env: &mut Env,
    pixels: &PixelAccess,
    functions: &HashMap<String, Function>,
) -> Value {
    match expr {
        Expr::Number(n) => Value::Float(*n),
        Expr::Ident(name) => env.get(name),
        Expr::Unary(inner) => {
            let v = eval(inner, env, pixels, functions);
            match v {
                Value::Int(i) => Value::Int(-i),
                Value::Float(f) => Value::Float(-f),
                Value::Array(a) => Value::Array(a.into_iter().map(|x| -x).collect()),
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let l = eval(lhs, env, pixels, functions).as_f64();
            let r = eval(rhs, env, pixels, functions).as_f64();
            let result = match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => if r != 0.0 { l / r } else { 0.0 },
                BinOp::Mod => if r != 0.0 { l.rem_euclid(r) } else { 0.0 },
            };
            Value::Float(result)
        }
        Expr::ArrayLit(elems) => {
            Value::Array(elems.iter().map(|e| eval(e, env, pixels, functions).as_f64()).collect())
        }
        Expr::Index(name, idx_expr) => {
            let idx = eval(idx_expr, env, pixels, functions).as_f64().floor() as i64;
            if name == "pixels" {
                if idx >= 0 && (idx as usize) < pixels.pixels.len() {
                    return Value::Float(pixels.pixels[idx as usize] as f64);
                }
                return Value::Float(0.0);
            }
            match env.get(name) {
                Value::Array(a) => {
                    if idx >= 0 && (idx as usize) < a.len() {
                        Value::Float(a[idx as usize])
                    } else {
                        Value::Float(0.0)
                    }
                }
                _ => Value::Float(0.0),
            }
        }
        Expr::Call(name, args) => {
            let values: Vec<Value> = args.iter().map(|a| eval(a, env, pixels, functions)).collect();
            eval_call(name, &values, env, pixels, functions)
        }
    }
}

fn eval_call(
    name: &str,
    args: &[Value],
    env: &mut Env,
    pixels: &PixelAccess,
    functions: &HashMap<String, Function>,
) -> Value {
    let f = |i: usize| args.get(i).map(Value::as_f64).unwrap_or(0.0);
    match name {
        "sin" if !args.is_empty() => Value::Float(f(0).sin()),
        "cos" if !args.is_empty() => Value::Float(f(0).cos()),
        "tan" if !args.is_empty() => Value::Float(f(0).tan()),
        "sqrt" if !args.is_empty() => Value::Float(f(0).max(0.0).sqrt()),
        "abs" if !args.is_empty() => Value::Float(f(0).abs()),
        "floor" if !args.is_empty() => Value::Float(f(0).floor()),
        "ceil" if !args.is_empty() => Value::Float(f(0).ceil()),
        "fract" if !args.is_empty() => Value::Float(f(0) - f(0).floor()),
        "pow" if args.len() >= 2 => Value::Float(f(0).powf(f(1))),
        "mix" if args.len() >= 3 => Value::Float(f(0) + (f(1) - f(0)) * f(2)),
        "step" if args.len() >= 2 => Value::Float(if f(1) < f(0) { 0.0 } else { 1.0 }),
        "smoothstep" if args.len() >= 3 => {
            let t = ((f(2) - f(0)) / (f(1) - f(0))).clamp(0.0, 1.0);
            Value::Float(t * t * (3.0 - 2.0 * t))
        }
        "min" if args.len() >= 2 => Value::Float(f(0).min(f(1))),
        "max" if args.len() >= 2 => Value::Float(f(0).max(f(1))),
        "clamp" if args.len() >= 3 => Value::Float(f(0).clamp(f(1).min(f(2)), f(1).max(f(2)))),
        _ => {
            if let Some(func) = functions.get(name) {
                crate::program::call_user_function(func, args, env, pixels, functions)
            } else {
                tracing::debug!(function = name, "pixel effect: unknown function, returning 0");
                Value::Int(0)
            }
        }
    }
}
