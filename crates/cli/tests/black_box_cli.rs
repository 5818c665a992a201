//! Black-box interpreter tests: text in, text out.

use retailsim_cli::{Interpreter, run_script};

struct Scenario {
    name: &'static str,
    steps: &'static [(&'static str, &'static str)],
}

/// Run each step through a fresh interpreter and compare the rendered line
/// (`Error: ...` for failures).
fn check(scenario: &Scenario) {
    let mut interpreter = Interpreter::new();
    for (input, expected) in scenario.steps {
        let actual = match interpreter.run_line(input) {
            Some(Ok(msg)) => msg,
            Some(Err(err)) => format!("Error: {err}"),
            None => String::new(),
        };
        assert_eq!(&actual, expected, "scenario `{}`, input `{input}`", scenario.name);
    }
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "sell half of the stock without campaign",
        steps: &[
            ("create_product P1 100 100", "Product created; code P1, price 100.0, stock 100"),
            ("create_order P1 50", "Order created; product P1, quantity 50"),
            ("get_product_info P1", "Product P1 info; price 100.0, stock 50"),
        ],
    },
    Scenario {
        name: "sell all of the stock without campaign",
        steps: &[
            ("create_product P1 100 100", "Product created; code P1, price 100.0, stock 100"),
            ("create_order P1 100", "Order created; product P1, quantity 100"),
            ("get_product_info P1", "Product P1 info; price 100.0, stock 0"),
        ],
    },
    Scenario {
        name: "sell more than the stock without campaign",
        steps: &[
            ("create_product P1 100 100", "Product created; code P1, price 100.0, stock 100"),
            (
                "create_order P1 150",
                "Error: Insufficient stock (requested 150, available 100)",
            ),
            ("get_product_info P1", "Product P1 info; price 100.0, stock 100"),
        ],
    },
    Scenario {
        name: "campaign with half of the stock sold keeps price",
        steps: &[
            ("create_product P1 100 100", "Product created; code P1, price 100.0, stock 100"),
            (
                "create_campaign C1 P1 10 20 100",
                "Campaign created; name C1, product P1, duration 10, limit 20, target sales count 100",
            ),
            ("create_order P1 50", "Order created; product P1, quantity 50"),
            ("get_product_info P1", "Product P1 info; price 100.0, stock 50"),
            (
                "get_campaign_info C1",
                "Campaign C1 info; Status Active, Target Sales 100, Total Sales 50, Turnover 5000.0, Average Item Price 100.0",
            ),
        ],
    },
    Scenario {
        name: "campaign ends when all of the stock is sold",
        steps: &[
            ("create_product P1 100 100", "Product created; code P1, price 100.0, stock 100"),
            (
                "create_campaign C1 P1 10 20 100",
                "Campaign created; name C1, product P1, duration 10, limit 20, target sales count 100",
            ),
            ("create_order P1 100", "Order created; product P1, quantity 100"),
            ("get_product_info P1", "Product P1 info; price 100.0, stock 0"),
            (
                "get_campaign_info C1",
                "Campaign C1 info; Status Ended, Target Sales 100, Total Sales 100, Turnover 10000.0, Average Item Price 100.0",
            ),
        ],
    },
    Scenario {
        name: "campaign counts only up to its target",
        steps: &[
            ("create_product P1 100 200", "Product created; code P1, price 100.0, stock 200"),
            (
                "create_campaign C1 P1 10 20 100",
                "Campaign created; name C1, product P1, duration 10, limit 20, target sales count 100",
            ),
            ("create_order P1 150", "Order created; product P1, quantity 150"),
            ("get_product_info P1", "Product P1 info; price 100.0, stock 50"),
            (
                "get_campaign_info C1",
                "Campaign C1 info; Status Ended, Target Sales 100, Total Sales 100, Turnover 10000.0, Average Item Price 100.0",
            ),
        ],
    },
    Scenario {
        name: "price increases when demand converts",
        steps: &[
            ("create_product P1 100 100", "Product created; code P1, price 100.0, stock 100"),
            (
                "create_campaign C1 P1 10 20 100",
                "Campaign created; name C1, product P1, duration 10, limit 20, target sales count 100",
            ),
            ("create_order P1 50", "Order created; product P1, quantity 50"),
            ("increase_time 1", "Time is 01:00"),
            ("get_product_info P1", "Product P1 info; price 120.0, stock 50"),
            (
                "get_campaign_info C1",
                "Campaign C1 info; Status Active, Target Sales 100, Total Sales 50, Turnover 5000.0, Average Item Price 100.0",
            ),
        ],
    },
    Scenario {
        name: "price decreases when demand does not convert",
        steps: &[
            ("create_product P1 100 100", "Product created; code P1, price 100.0, stock 100"),
            (
                "create_campaign C1 P1 10 20 100",
                "Campaign created; name C1, product P1, duration 10, limit 20, target sales count 100",
            ),
            ("get_product_info P1", "Product P1 info; price 100.0, stock 100"),
            ("increase_time 1", "Time is 01:00"),
            ("get_product_info P1", "Product P1 info; price 80.0, stock 100"),
            (
                "get_campaign_info C1",
                "Campaign C1 info; Status Active, Target Sales 100, Total Sales 0, Turnover 0.0, Average Item Price 0.0",
            ),
        ],
    },
    Scenario {
        name: "campaign ends when duration is over",
        steps: &[
            ("create_product P1 100 100", "Product created; code P1, price 100.0, stock 100"),
            (
                "create_campaign C1 P1 1 20 100",
                "Campaign created; name C1, product P1, duration 1, limit 20, target sales count 100",
            ),
            ("increase_time 1", "Time is 01:00"),
            (
                "get_campaign_info C1",
                "Campaign C1 info; Status Ended, Target Sales 100, Total Sales 0, Turnover 0.0, Average Item Price 0.0",
            ),
        ],
    },
    Scenario {
        name: "price goes back to initial after campaign ends",
        steps: &[
            ("create_product P1 100 200", "Product created; code P1, price 100.0, stock 200"),
            (
                "create_campaign C1 P1 10 20 100",
                "Campaign created; name C1, product P1, duration 10, limit 20, target sales count 100",
            ),
            ("create_order P1 100", "Order created; product P1, quantity 100"),
            ("increase_time 1", "Time is 01:00"),
            ("get_product_info P1", "Product P1 info; price 100.0, stock 100"),
            (
                "get_campaign_info C1",
                "Campaign C1 info; Status Ended, Target Sales 100, Total Sales 100, Turnover 10000.0, Average Item Price 100.0",
            ),
        ],
    },
];

#[test]
fn reference_scenarios() {
    for scenario in SCENARIOS {
        check(scenario);
    }
}

#[test]
fn interpreter_errors() {
    check(&Scenario {
        name: "interpreter errors",
        steps: &[
            ("invalid_command", "Error: Command not found"),
            ("create_product P2 100", "Error: Invalid parameters"),
            ("create_product P3 invalid_price 1000", "Error: Price must be float"),
            ("create_product P4 100 invalid_stock", "Error: Stock must be integer"),
            ("create_product P1 100 1000", "Product created; code P1, price 100.0, stock 1000"),
            ("create_product P1 100 1000", "Error: Product already exist"),
            ("get_product_info", "Error: Invalid parameters"),
            ("get_product_info P3", "Error: Product not found"),
            ("create_order P2", "Error: Invalid parameters"),
            ("create_order P3 10", "Error: Product not found"),
            ("create_order P1 invalid_quantity", "Error: Quantity must be integer"),
            ("create_order P1 0", "Error: Quantity must be positive"),
            ("create_campaign C1 P1", "Error: Invalid parameters"),
            ("create_campaign C1 P2 10 20 3", "Error: Product not found"),
            ("create_campaign C1 P1 invalid_duration 20 3", "Error: Duration must be integer"),
            ("create_campaign C1 P1 10 invalid_limit 3", "Error: Limit must be integer"),
            ("create_campaign C1 P1 10 20 invalid_target", "Error: Target sales must be integer"),
            (
                "create_campaign C1 P1 10 20 1001",
                "Error: Target sales count must be less than stock",
            ),
            ("get_campaign_info C1", "Error: Campaign not found"),
            ("increase_time 1", "Error: No campaign found"),
            (
                "create_campaign C1 P1 10 20 3",
                "Campaign created; name C1, product P1, duration 10, limit 20, target sales count 3",
            ),
            ("create_campaign C1 P1 10 20 3", "Error: Campaign already exist"),
            ("increase_time invalid_hour", "Error: Hour must be integer"),
            ("increase_time 0", "Error: Hour must be positive"),
            ("increase_time 10", "Time is 10:00"),
        ],
    });
}

#[test]
fn clock_wraps_at_midnight() {
    check(&Scenario {
        name: "clock",
        steps: &[
            ("create_product P1 100 100", "Product created; code P1, price 100.0, stock 100"),
            (
                "create_campaign C1 P1 48 20 10",
                "Campaign created; name C1, product P1, duration 48, limit 20, target sales count 10",
            ),
            ("increase_time 23", "Time is 23:00"),
            ("increase_time 2", "Time is 01:00"),
        ],
    });
}

#[test]
fn script_runner_matches_line_by_line_output() {
    let script = "\
create_product P1 100 1000

get_product_info P1
create_order P1 10
create_campaign C1 P1 10 20 100
get_campaign_info C1
unknown
increase_time 10
exit
get_product_info P1
";
    let mut interpreter = Interpreter::new();
    let mut out = Vec::new();
    run_script(&mut interpreter, script.as_bytes(), &mut out, None).unwrap();

    let expected = "\
Product created; code P1, price 100.0, stock 1000
Product P1 info; price 100.0, stock 1000
Order created; product P1, quantity 10
Campaign created; name C1, product P1, duration 10, limit 20, target sales count 100
Campaign C1 info; Status Active, Target Sales 100, Total Sales 0, Turnover 0.0, Average Item Price 0.0
Error: Command not found
Time is 10:00
";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}
