use std::iter;

use tracing::{debug, trace};

use crate::interpreter::env::{Env, ScopeId};
use crate::interpreter::function::{Function, Lambda};
use crate::interpreter::value::Value;
use crate::lerr;

/// Evaluate `val` in `scope`. Symbols resolve through the environment, `( ... )` lists are
/// applied, everything else evaluates to itself.
pub fn eval(env: &mut Env, scope: ScopeId, val: Value) -> Value {
    match val {
        Value::Symbol(name) => {
            let resolved = env.get(scope, &name);
            trace!("symbol / {} => {}", name, resolved);
            resolved
        }
        Value::EvalList(cells) => eval_list(env, scope, cells),
        _ => val,
    }
}

fn eval_list(env: &mut Env, scope: ScopeId, cells: Vec<Value>) -> Value {
    // every child is evaluated before looking for errors; the leftmost one wins
    let mut cells: Vec<Value> = cells.into_iter().map(|cell| eval(env, scope, cell)).collect();
    if let Some(i) = cells.iter().position(Value::is_error) {
        return cells.swap_remove(i);
    }

    let mut cells = cells.into_iter();
    let head = match cells.next() {
        Some(head) => head,
        None => return Value::unit(),
    };
    let args: Vec<Value> = cells.collect();
    if args.is_empty() {
        return head;
    }

    match head {
        Value::Function(f) => call(env, scope, f, args),
        other => lerr!(
            "S-Expression starts with incorrect type. Got {}, Expected Function.",
            other.type_name()
        ),
    }
}

/// Apply `f` to evaluated `args` from `scope`.
pub fn call(env: &mut Env, scope: ScopeId, f: Function, args: Vec<Value>) -> Value {
    match f {
        Function::Builtin(op) => op.call(env, scope, args),
        Function::Lambda(lambda) => call_lambda(env, scope, lambda, args),
    }
}

fn invalid_variadic() -> Value { lerr!("Function format invalid. Symbol '&' not followed by single symbol.") }

fn call_lambda(env: &mut Env, scope: ScopeId, mut lambda: Lambda, args: Vec<Value>) -> Value {
    let given = args.len();
    let total = lambda.formals.len();
    debug!(formals = total, argc = given, "apply lambda");

    let mut formals = std::mem::take(&mut lambda.formals).into_iter();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let name = match formals.next() {
            Some(Value::Symbol(name)) => name,
            Some(other) => return lerr!("Cannot define non-symbol. Got {}, Expected Symbol.", other.type_name()),
            None => return lerr!("Function passed too many arguments. Got {}, Expected {}.", given, total),
        };

        if name == "&" {
            let rest = match (formals.next(), formals.next()) {
                (Some(Value::Symbol(rest)), None) => rest,
                _ => return invalid_variadic(),
            };
            let collected = iter::once(arg).chain(args.by_ref()).collect();
            lambda.env.put(&rest, Value::LiteralList(collected));
            break;
        }
        lambda.env.put(&name, arg);
    }

    let mut remaining: Vec<Value> = formals.collect();
    if matches!(remaining.first(), Some(Value::Symbol(marker)) if marker == "&") {
        match remaining.as_slice() {
            [_, Value::Symbol(rest)] => lambda.env.put(rest, Value::LiteralList(vec![])),
            _ => return invalid_variadic(),
        }
        remaining.clear();
    }

    if !remaining.is_empty() {
        trace!(remaining = remaining.len(), "partial application");
        lambda.formals = remaining;
        return Value::Function(Function::Lambda(lambda));
    }

    // lexical scope: the body sees its captured bindings, then globals, never the caller
    let root = env.root_of(scope);
    let frame = env.enter(root, lambda.env);
    let result = eval(env, frame, Value::EvalList(lambda.body));
    env.leave(frame);
    result
}
