use lispy::reader::{read_nodes_from_str, Node};
use lispy::{Interpreter, Value};

fn symbol(text: &str) -> Node { Node::leaf("expr|symbol|regex", text) }

fn number(text: &str) -> Node { Node::leaf("expr|number|regex", text) }

fn qexpr(children: Vec<Node>) -> Node { Node::branch("expr|qexpr", children) }

fn sexpr(children: Vec<Node>) -> Node { Node::branch("expr|sexpr", children) }

fn program(children: Vec<Node>) -> Node { Node::branch(">", children) }

fn render(nodes: &[Node]) -> Vec<String> { Interpreter::new().run(nodes).iter().map(Value::to_string).collect() }

#[test]
fn test_definitions_persist_between_trees() {
    // def {add} (\ {a b} {+ a b})
    // def {inc} (add 1)
    // inc 41
    let nodes = vec![
        program(vec![
            symbol("def"),
            qexpr(vec![symbol("add")]),
            sexpr(vec![
                symbol("\\"),
                qexpr(vec![symbol("a"), symbol("b")]),
                qexpr(vec![symbol("+"), symbol("a"), symbol("b")]),
            ]),
        ]),
        program(vec![symbol("def"), qexpr(vec![symbol("inc")]), sexpr(vec![symbol("add"), number("1")])]),
        program(vec![symbol("inc"), number("41")]),
        program(vec![symbol("inc")]),
    ];
    assert_eq!(render(&nodes), vec!["()", "()", "42", "(\\ {b} {+ a b})"]);
}

#[test]
fn test_errors_are_values() {
    let nodes = vec![
        program(vec![symbol("/"), number("1"), number("0")]),
        program(vec![symbol("head"), qexpr(vec![])]),
        program(vec![symbol("missing")]),
        program(vec![number("1"), number("2")]),
    ];
    assert_eq!(
        render(&nodes),
        vec![
            "Error: Division By Zero.",
            "Error: Function 'head' passed {} for argument 0.",
            "Error: Unbound Symbol: `missing`",
            "Error: S-Expression starts with incorrect type. Got Number, Expected Function.",
        ]
    );
}

#[test]
fn test_malformed_json_is_a_host_error() {
    let err = read_nodes_from_str(r#"{"tag": ">", "children": ["#).unwrap_err();
    assert!(matches!(err, lispy::Error::Json(_)));
}

#[test]
fn test_json_documents_in_sequence() {
    let src = r#"{"tag":">","children":[{"tag":"expr|symbol|regex","contents":"join"},{"tag":"expr|qexpr","children":[{"tag":"expr|number|regex","contents":"1"}]},{"tag":"expr|qexpr","children":[{"tag":"expr|number|regex","contents":"2"}]}]}
{"tag":">","children":[]}"#;
    let nodes = read_nodes_from_str(src).unwrap();
    assert_eq!(render(&nodes), vec!["{1 2}", "()"]);
}
