/// Expression AST produced by the recursive-descent parser (spec.md §4.6).
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Ident(String),
    Unary(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
    /// `arr[i]` or `pixels[i]` — both indexing forms share one node; which
    /// one applies is resolved at evaluation time by name.
    Index(String, Box<Expr>),
    ArrayLit(Vec<Expr>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Not in the formal grammar in spec.md §4.6, but required by the
    /// documented effect-determinism test (`r = (x + y) % 256`). Treated as
    /// another term-level operator alongside `*`/`/`.
    Mod,
}

/// One statement inside a user function body (`defn`).
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Return(Expr),
    Assign(String, Expr),
    AddAssign(String, Expr),
    Increment(String),
    /// `for (int VAR = FROM; VAR <= TO; VAR++) { BODY }` — the only loop
    /// form the interpreter recognizes (spec.md §4.6).
    For { var: String, from: Expr, to: Expr, body: Vec<Stmt> },
}

/// One top-level output-assignment line, executed once per pixel.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputStmt {
    Channel(Channel, Expr),
    /// `chunk4*:[r, g, b, a] = CALL` — expects a 4-element array result.
    Chunk4(Expr),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    R,
    G,
    B,
    A,
}
