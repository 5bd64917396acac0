mod support;

use dairybook_client::commands::demo::{self, DemoInvoiceOptions};
use dairybook_client::commands::invoice::{self, InvoiceRunOptions};
use dairybook_client::{SourcePaths, TableLayout};
use support::billing_testkit::{
    assert_close, date, number, statuses, success_data, success_notices, temp_home_in_tmp,
    write_fixture,
};

#[test]
fn three_day_cycle_with_payment_on_cycle_end() {
    let temp = temp_home_in_tmp("dairybook-invoice-basic");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let morning = write_fixture(
            dir.path(),
            "morning.csv",
            "Timestamp,Customer,Date,Litres\n2026-01-01 06:00:00,CUST001,2026-01-01,2\n",
        );
        let evening = write_fixture(
            dir.path(),
            "evening.csv",
            "customer_id,date,qty\nCUST001,2026-01-01,1\n",
        );
        let payments = write_fixture(
            dir.path(),
            "payments.json",
            r#"[{"customer":"CUST001","amount":200,"date":"2026-01-03"}]"#,
        );

        let data = success_data(invoice::run_with_options(InvoiceRunOptions {
            customer: "CUST001".to_string(),
            start: Some("2026-01-01".to_string()),
            days: Some(3),
            price: Some(45.0),
            today: date("2026-01-10"),
            sources: SourcePaths {
                morning,
                evening,
                payments,
                ..SourcePaths::default()
            },
            home_override: Some(&home),
            stdin_override: None,
        }));

        assert_eq!(data["cycle_start"], "2026-01-01");
        assert_eq!(data["cycle_end"], "2026-01-03");
        assert_close(number(&data["total_quantity"]), 3.0);
        assert_close(number(&data["gross_amount"]), 135.0);
        assert_close(number(&data["early_payments"]), 200.0);
        assert_close(number(&data["final_payable"]), 0.0);
        assert_close(number(&data["credit"]), 65.0);
        assert_eq!(
            statuses(&data["days"]),
            vec!["both_present", "both_missing", "both_missing"]
        );

        let calendar_rows = data["calendar"]["rows"].as_array().cloned().unwrap_or_default();
        assert_eq!(calendar_rows.len(), 1);
        let cells = calendar_rows[0].as_array().cloned().unwrap_or_default();
        assert_eq!(cells.len(), 7);
        assert_eq!(cells[0]["color"], "#ffffff");
        assert_eq!(cells[1]["color"], "#ff9999");
        assert!(cells[3].is_null());
        assert_eq!(data["calendar"]["legend"].as_array().map(Vec::len), Some(4));

        assert_eq!(data["payments"][0]["counted_in_cycle"], true);
        assert_eq!(data["sources"].as_array().map(Vec::len), Some(3));
    }
}

#[test]
fn default_start_is_first_delivery_and_late_payments_are_excluded() {
    let temp = temp_home_in_tmp("dairybook-invoice-anchor");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let morning = write_fixture(
            dir.path(),
            "morning.csv",
            "customer,date,qty\nCUST001,2026-01-09,1\nCUST001,2026-01-05,2\n",
        );
        let payments = write_fixture(
            dir.path(),
            "payments.csv",
            "customer,amount,date\nCUST001,30,2026-02-03\nCUST001,500,2026-02-04\n",
        );

        let data = success_data(invoice::run_with_options(InvoiceRunOptions {
            customer: "CUST001".to_string(),
            today: date("2026-02-01"),
            sources: SourcePaths {
                morning,
                payments,
                ..SourcePaths::default()
            },
            home_override: Some(&home),
            ..InvoiceRunOptions::default()
        }));

        assert_eq!(data["cycle_start"], "2026-01-05");
        assert_eq!(data["cycle_end"], "2026-02-03");
        assert_eq!(data["cycle_length_days"], 30);
        assert_eq!(data["days"].as_array().map(Vec::len), Some(30));
        assert_close(number(&data["gross_amount"]), 135.0);
        assert_close(number(&data["early_payments"]), 30.0);
        assert_close(number(&data["final_payable"]), 105.0);
        assert_eq!(data["payments"][1]["counted_in_cycle"], false);
        assert_eq!(
            statuses(&data["days"])[0],
            "evening_missing"
        );
    }
}

#[test]
fn missing_quantity_column_and_amountless_payments_degrade_with_notices() {
    let temp = temp_home_in_tmp("dairybook-invoice-degrade");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let morning = write_fixture(
            dir.path(),
            "morning.csv",
            "customer,date,note\nCUST001,2026-01-01,gate closed\nCUST001,not a date,x\n",
        );
        let payments = write_fixture(
            dir.path(),
            "payments.csv",
            "customer,note\nCUST001,pays next week\n",
        );

        let result = invoice::run_with_options(InvoiceRunOptions {
            customer: "CUST001".to_string(),
            start: Some("2026-01-01".to_string()),
            days: Some(2),
            today: date("2026-01-10"),
            sources: SourcePaths {
                morning,
                payments,
                ..SourcePaths::default()
            },
            home_override: Some(&home),
            ..InvoiceRunOptions::default()
        });
        let notices = success_notices(&result);
        assert!(notices.iter().any(|notice| notice.contains("no quantity column")));
        assert!(notices.iter().any(|notice| notice.contains("dropped 1 row")));
        assert!(notices.iter().any(|notice| notice.contains("no amount column")));

        let data = success_data(result);
        assert_close(number(&data["total_quantity"]), 0.0);
        assert_close(number(&data["early_payments"]), 0.0);
        assert_eq!(data["payments"].as_array().map(Vec::len), Some(0));
    }
}

#[test]
fn config_prices_apply_and_explicit_price_wins() {
    let temp = temp_home_in_tmp("dairybook-invoice-config");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let config = std::fs::write(
            home.join("config.json"),
            r#"{"price_per_unit": 50, "customer_prices": {"cust001": 40}}"#,
        );
        assert!(config.is_ok());
        let morning = write_fixture(
            dir.path(),
            "morning.csv",
            "customer,date,qty\nCUST001,2026-01-01,3\nCUST002,2026-01-01,1\n",
        );
        let options = |customer: &str, price: Option<f64>| InvoiceRunOptions {
            customer: customer.to_string(),
            start: Some("2026-01-01".to_string()),
            days: Some(3),
            price,
            today: date("2026-01-10"),
            sources: SourcePaths {
                morning: morning.clone(),
                ..SourcePaths::default()
            },
            home_override: Some(&home),
            stdin_override: None,
        };

        let overridden = success_data(invoice::run_with_options(options("CUST001", None)));
        assert_close(number(&overridden["price_per_unit"]), 40.0);
        assert_close(number(&overridden["gross_amount"]), 120.0);

        let default_price = success_data(invoice::run_with_options(options("CUST002", None)));
        assert_close(number(&default_price["gross_amount"]), 50.0);

        let explicit = success_data(invoice::run_with_options(options("CUST001", Some(60.0))));
        assert_close(number(&explicit["gross_amount"]), 180.0);
    }
}

#[test]
fn customer_argument_matches_normalized_names() {
    let temp = temp_home_in_tmp("dairybook-invoice-names");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let morning = write_fixture(
            dir.path(),
            "morning.csv",
            "customer,date,qty\nSita Devi,2026-01-01,2\n",
        );
        let data = success_data(invoice::run_with_options(InvoiceRunOptions {
            customer: "  sita   DEVI ".to_string(),
            start: Some("2026-01-01".to_string()),
            days: Some(1),
            today: date("2026-01-10"),
            sources: SourcePaths {
                morning,
                ..SourcePaths::default()
            },
            home_override: Some(&home),
            ..InvoiceRunOptions::default()
        }));
        assert_eq!(data["customer_id"], "Sita Devi");
        assert_close(number(&data["total_quantity"]), 2.0);
    }
}

#[test]
fn wide_layout_melts_customer_columns() {
    let temp = temp_home_in_tmp("dairybook-invoice-wide");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let morning = write_fixture(
            dir.path(),
            "morning.csv",
            "Date,Sita,Ravi\n2026-03-01,1.5,\n2026-03-02,2,1\n",
        );
        let evening = write_fixture(dir.path(), "evening.csv", "Date,Sita\n2026-03-01,1\n");

        let data = success_data(invoice::run_with_options(InvoiceRunOptions {
            customer: "Sita".to_string(),
            start: Some("2026-03-01".to_string()),
            days: Some(2),
            price: Some(40.0),
            today: date("2026-03-10"),
            sources: SourcePaths {
                morning,
                evening,
                layout: TableLayout::Wide,
                ..SourcePaths::default()
            },
            home_override: Some(&home),
            stdin_override: None,
        }));
        assert_close(number(&data["total_quantity"]), 4.5);
        assert_close(number(&data["gross_amount"]), 180.0);
        assert_eq!(statuses(&data["days"]), vec!["both_present", "evening_missing"]);
    }
}

#[test]
fn stdin_feeds_one_table_and_conflicts_are_rejected() {
    let temp = temp_home_in_tmp("dairybook-invoice-stdin");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let data = success_data(invoice::run_with_options(InvoiceRunOptions {
            customer: "CUST001".to_string(),
            start: Some("2026-01-01".to_string()),
            days: Some(1),
            today: date("2026-01-10"),
            sources: SourcePaths {
                morning: Some("-".to_string()),
                ..SourcePaths::default()
            },
            home_override: Some(&home),
            stdin_override: Some("customer,date,qty\nCUST001,2026-01-01,1.25\n".to_string()),
            ..InvoiceRunOptions::default()
        }));
        assert_close(number(&data["total_quantity"]), 1.25);
        assert_eq!(data["sources"][0]["source_kind"], "stdin");

        let conflict = invoice::run_with_options(InvoiceRunOptions {
            customer: "CUST001".to_string(),
            today: date("2026-01-10"),
            sources: SourcePaths {
                morning: Some("-".to_string()),
                evening: Some("-".to_string()),
                ..SourcePaths::default()
            },
            home_override: Some(&home),
            stdin_override: Some("customer,date,qty\n".to_string()),
            ..InvoiceRunOptions::default()
        });
        assert!(conflict.is_err());
        if let Err(error) = conflict {
            assert_eq!(error.code, "invalid_argument");
        }
    }
}

#[test]
fn unreadable_sources_and_bad_arguments_fail() {
    let temp = temp_home_in_tmp("dairybook-invoice-errors");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let missing_path = dir.path().join("nope.csv").display().to_string();
        let unreadable = invoice::run_with_options(InvoiceRunOptions {
            customer: "CUST001".to_string(),
            today: date("2026-01-10"),
            sources: SourcePaths {
                payments: Some(missing_path),
                ..SourcePaths::default()
            },
            home_override: Some(&home),
            ..InvoiceRunOptions::default()
        });
        assert!(unreadable.is_err());
        if let Err(error) = unreadable {
            assert_eq!(error.code, "source_unreadable");
        }

        let bad_start = invoice::run_with_options(InvoiceRunOptions {
            customer: "CUST001".to_string(),
            start: Some("2026-02-30".to_string()),
            today: date("2026-01-10"),
            home_override: Some(&home),
            ..InvoiceRunOptions::default()
        });
        assert!(bad_start.is_err());

        let zero_days = invoice::run_with_options(InvoiceRunOptions {
            customer: "CUST001".to_string(),
            days: Some(0),
            today: date("2026-01-10"),
            home_override: Some(&home),
            ..InvoiceRunOptions::default()
        });
        assert!(zero_days.is_err());

        let blank_customer = invoice::run_with_options(InvoiceRunOptions {
            customer: "  ".to_string(),
            today: date("2026-01-10"),
            home_override: Some(&home),
            ..InvoiceRunOptions::default()
        });
        assert!(blank_customer.is_err());
    }
}

#[test]
fn demo_invoice_is_deterministic_for_a_given_today() {
    let options = || DemoInvoiceOptions {
        customer: None,
        today: date("2026-05-20"),
    };
    let first = demo::run_invoice_with_options(options());
    let notices = success_notices(&first);
    assert_eq!(notices.len(), 1);

    let data = success_data(first);
    assert_eq!(data["customer_id"], "CUST001");
    assert_eq!(data["cycle_start"], "2026-05-10");
    assert_eq!(data["days"].as_array().map(Vec::len), Some(30));
    assert_close(number(&data["total_quantity"]), 39.6);
    assert_close(number(&data["gross_amount"]), 39.6 * 45.0);
    assert_close(number(&data["early_payments"]), 200.0);

    let second = success_data(demo::run_invoice_with_options(options()));
    assert_eq!(data, second);

    let other = success_data(demo::run_invoice_with_options(DemoInvoiceOptions {
        customer: Some("cust002".to_string()),
        today: date("2026-05-20"),
    }));
    assert_eq!(other["customer_id"], "CUST002");
    assert_close(number(&other["early_payments"]), 100.0);
}
