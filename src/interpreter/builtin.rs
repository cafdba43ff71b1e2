use phf::phf_map;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::interpreter::env::{Env, ScopeId};
use crate::interpreter::eval::eval;
use crate::interpreter::value::Value;
use crate::{lassert, lassert_not_empty, lassert_num, lassert_type, lerr};

#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(into = "String")]
#[serde(try_from = "String")]
pub enum Builtin {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,

    List,
    Head,
    Tail,
    Join,
    Eval,
    Cons,
    Len,
    Init,

    Def,
    Put,
    Lambda,

    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    If,
}

pub static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "+" => Builtin::Add,
    "-" => Builtin::Sub,
    "*" => Builtin::Mul,
    "/" => Builtin::Div,
    "%" => Builtin::Rem,
    "^" => Builtin::Pow,
    "list" => Builtin::List,
    "head" => Builtin::Head,
    "tail" => Builtin::Tail,
    "join" => Builtin::Join,
    "eval" => Builtin::Eval,
    "cons" => Builtin::Cons,
    "len" => Builtin::Len,
    "init" => Builtin::Init,
    "def" => Builtin::Def,
    "=" => Builtin::Put,
    "\\" => Builtin::Lambda,
    ">" => Builtin::Gt,
    "<" => Builtin::Lt,
    ">=" => Builtin::Ge,
    "<=" => Builtin::Le,
    "==" => Builtin::Eq,
    "!=" => Builtin::Ne,
    "if" => Builtin::If,
};

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Rem => "%",
            Builtin::Pow => "^",
            Builtin::List => "list",
            Builtin::Head => "head",
            Builtin::Tail => "tail",
            Builtin::Join => "join",
            Builtin::Eval => "eval",
            Builtin::Cons => "cons",
            Builtin::Len => "len",
            Builtin::Init => "init",
            Builtin::Def => "def",
            Builtin::Put => "=",
            Builtin::Lambda => "\\",
            Builtin::Gt => ">",
            Builtin::Lt => "<",
            Builtin::Ge => ">=",
            Builtin::Le => "<=",
            Builtin::Eq => "==",
            Builtin::Ne => "!=",
            Builtin::If => "if",
        }
    }

    pub fn lookup(name: &str) -> Option<Builtin> { BUILTINS.get(name).copied() }

    /// Apply to already evaluated arguments. The arguments are consumed whatever the outcome.
    pub fn call(self, env: &mut Env, scope: ScopeId, args: Vec<Value>) -> Value {
        debug!(op = self.name(), argc = args.len(), "apply builtin");
        match self {
            Builtin::Add | Builtin::Sub | Builtin::Mul | Builtin::Div | Builtin::Rem | Builtin::Pow => arithmetic(self, args),
            Builtin::List => Value::LiteralList(args),
            Builtin::Head => head(args),
            Builtin::Tail => tail(args),
            Builtin::Join => join(args),
            Builtin::Eval => eval_literal(env, scope, args),
            Builtin::Cons => cons(args),
            Builtin::Len => len(args),
            Builtin::Init => init(args),
            Builtin::Def | Builtin::Put => bind(self, env, scope, args),
            Builtin::Lambda => lambda(env, scope, args),
            Builtin::Gt | Builtin::Lt | Builtin::Ge | Builtin::Le => order(self, args),
            Builtin::Eq | Builtin::Ne => equality(self, args),
            Builtin::If => if_else(env, scope, args),
        }
    }
}

impl From<Builtin> for String {
    fn from(op: Builtin) -> String { op.name().to_string() }
}

impl TryFrom<String> for Builtin {
    type Error = String;

    fn try_from(name: String) -> Result<Builtin, String> { Builtin::lookup(&name).ok_or_else(|| format!("Unknown builtin: {:?}", name)) }
}

fn numbers(op: Builtin, args: Vec<Value>) -> Result<Vec<i64>, Value> {
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| match arg {
            Value::Number(n) => Ok(n),
            other => Err(lerr!(
                "Function '{}' passed incorrect type for argument {}. Got {}, Expected Number.",
                op.name(),
                i,
                other.type_name()
            )),
        })
        .collect()
}

fn overflow() -> Value { lerr!("Integer Overflow.") }

fn apply_op(op: Builtin, x: i64, y: i64) -> Result<i64, Value> {
    let result = match op {
        Builtin::Add => x.checked_add(y),
        Builtin::Sub => x.checked_sub(y),
        Builtin::Mul => x.checked_mul(y),
        Builtin::Div | Builtin::Rem if y == 0 => return Err(lerr!("Division By Zero.")),
        Builtin::Div => x.checked_div(y),
        Builtin::Rem => x.checked_rem(y),
        Builtin::Pow => {
            if y < 0 {
                return Err(lerr!("Function '^' passed negative exponent {}.", y));
            }
            u32::try_from(y).ok().and_then(|e| x.checked_pow(e))
        }
        _ => unreachable!("not an arithmetic builtin: {:?}", op),
    };
    result.ok_or_else(overflow)
}

fn arithmetic(op: Builtin, args: Vec<Value>) -> Value {
    let nums = match numbers(op, args) {
        Ok(nums) => nums,
        Err(e) => return e,
    };
    let folded = match (op, nums.split_first()) {
        (Builtin::Add, None) => Ok(0),
        (Builtin::Mul, None) => Ok(1),
        (_, None) => return lerr!("Function '{}' passed incorrect number of arguments. Got 0, Expected 1.", op.name()),
        (Builtin::Sub, Some((&x, []))) => x.checked_neg().ok_or_else(overflow),
        (_, Some((&first, rest))) => rest.iter().try_fold(first, |acc, &y| apply_op(op, acc, y)),
    };
    match folded {
        Ok(n) => Value::Number(n),
        Err(e) => e,
    }
}

fn take_list(mut args: Vec<Value>) -> Vec<Value> {
    match args.pop().and_then(Value::into_cells) {
        Some(cells) => cells,
        None => vec![],
    }
}

fn head(args: Vec<Value>) -> Value {
    lassert_num!("head", args, 1);
    lassert_type!("head", args, 0, LiteralList, "Q-Expression");
    lassert_not_empty!("head", args, 0);

    let mut cells = take_list(args);
    cells.truncate(1);
    Value::LiteralList(cells)
}

fn tail(args: Vec<Value>) -> Value {
    lassert_num!("tail", args, 1);
    lassert_type!("tail", args, 0, LiteralList, "Q-Expression");
    lassert_not_empty!("tail", args, 0);

    let mut cells = take_list(args);
    cells.remove(0);
    Value::LiteralList(cells)
}

fn init(args: Vec<Value>) -> Value {
    lassert_num!("init", args, 1);
    lassert_type!("init", args, 0, LiteralList, "Q-Expression");
    lassert_not_empty!("init", args, 0);

    let mut cells = take_list(args);
    cells.pop();
    Value::LiteralList(cells)
}

fn len(args: Vec<Value>) -> Value {
    lassert_num!("len", args, 1);
    lassert_type!("len", args, 0, LiteralList, "Q-Expression");

    match i64::try_from(take_list(args).len()) {
        Ok(n) => Value::Number(n),
        Err(_) => overflow(),
    }
}

fn cons(mut args: Vec<Value>) -> Value {
    lassert_num!("cons", args, 2);
    lassert_type!("cons", args, 1, LiteralList, "Q-Expression");

    let mut cells = take_list(args.split_off(1));
    cells.insert(0, args.remove(0));
    Value::LiteralList(cells)
}

fn join(args: Vec<Value>) -> Value {
    for i in 0..args.len() {
        lassert_type!("join", args, i, LiteralList, "Q-Expression");
    }
    Value::LiteralList(args.into_iter().filter_map(Value::into_cells).flatten().collect())
}

fn eval_literal(env: &mut Env, scope: ScopeId, args: Vec<Value>) -> Value {
    lassert_num!("eval", args, 1);
    lassert_type!("eval", args, 0, LiteralList, "Q-Expression");

    eval(env, scope, Value::EvalList(take_list(args)))
}

/// `def` writes the root of the chain, `=` the current frame.
fn bind(op: Builtin, env: &mut Env, scope: ScopeId, mut args: Vec<Value>) -> Value {
    let name = op.name();
    lassert!(
        !args.is_empty(),
        "Function '{}' passed incorrect number of arguments. Got 0, Expected 1.",
        name
    );
    lassert_type!(name, args, 0, LiteralList, "Q-Expression");

    let values = args.split_off(1);
    let symbols = take_list(args);
    for sym in symbols.iter() {
        lassert!(
            matches!(sym, Value::Symbol(_)),
            "Function '{}' cannot define non-symbol. Got {}, Expected Symbol.",
            name,
            sym.type_name()
        );
    }
    lassert!(
        symbols.len() == values.len(),
        "Function '{}' passed incorrect number of values. Got {}, Expected {}.",
        name,
        values.len(),
        symbols.len()
    );

    for (sym, value) in symbols.into_iter().zip(values) {
        if let Value::Symbol(sym) = sym {
            match op {
                Builtin::Def => env.def(scope, &sym, value),
                _ => env.put(scope, &sym, value),
            }
        }
    }
    Value::unit()
}

/// Closes over a copy of the local bindings visible from `scope`.
fn lambda(env: &Env, scope: ScopeId, mut args: Vec<Value>) -> Value {
    lassert_num!("\\", args, 2);
    lassert_type!("\\", args, 0, LiteralList, "Q-Expression");
    lassert_type!("\\", args, 1, LiteralList, "Q-Expression");

    let body = take_list(args.split_off(1));
    let formals = take_list(args);
    for formal in formals.iter() {
        lassert!(
            matches!(formal, Value::Symbol(_)),
            "Cannot define non-symbol. Got {}, Expected Symbol.",
            formal.type_name()
        );
    }
    Value::lambda(formals, body, env.capture(scope))
}

fn truth(b: bool) -> Value { Value::Number(b as i64) }

fn order(op: Builtin, args: Vec<Value>) -> Value {
    lassert_num!(op.name(), args, 2);
    let nums = match numbers(op, args) {
        Ok(nums) => nums,
        Err(e) => return e,
    };
    let (x, y) = (nums[0], nums[1]);
    truth(match op {
        Builtin::Gt => x > y,
        Builtin::Lt => x < y,
        Builtin::Ge => x >= y,
        _ => x <= y,
    })
}

fn equality(op: Builtin, args: Vec<Value>) -> Value {
    lassert_num!(op.name(), args, 2);
    let same = args[0] == args[1];
    truth(if op == Builtin::Eq { same } else { !same })
}

fn if_else(env: &mut Env, scope: ScopeId, mut args: Vec<Value>) -> Value {
    lassert_num!("if", args, 3);
    lassert_type!("if", args, 0, Number, "Number");
    lassert_type!("if", args, 1, LiteralList, "Q-Expression");
    lassert_type!("if", args, 2, LiteralList, "Q-Expression");

    let otherwise = args.pop();
    let then = args.pop();
    let branch = match args.pop() {
        Some(Value::Number(0)) => otherwise,
        _ => then,
    };
    match branch.and_then(Value::into_cells) {
        Some(cells) => eval(env, scope, Value::EvalList(cells)),
        None => Value::unit(),
    }
}
