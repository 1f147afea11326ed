//! Demo data set

use rusqlite::Connection;

use super::schema::ENTITY_TABLES;

/// What `seed_demo` inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedStats {
    pub tables: usize,
    pub records: i64,
}

// Remaining quantities are consistent with the sale items below.
const DEMO_SQL: &str = r#"
INSERT INTO position (position_id, position_name, position_description) VALUES
    (1, 'Manager', 'Purchasing and supplier relations'),
    (2, 'Sales clerk', NULL),
    (3, 'Storekeeper', 'Receives batches and keeps the storage cells');

INSERT INTO supplier_category (category_id, category_name, provides_guarantee, provides_discount, category_description) VALUES
    (1, 'Manufacturer', 1, 1, 'Factory direct'),
    (2, 'Dealer', 1, 0, NULL),
    (3, 'Small producer', 0, 0, 'Workshops and small series');

INSERT INTO supplier (supplier_id, supplier_category_id, supplier_name, supplier_address, supplier_country, is_active) VALUES
    (1, 1, 'Bosch Parts', 'Robert-Bosch-Platz 1, Gerlingen', 'Germany', 1),
    (2, 1, 'Denso Trade', '1-1 Showa-cho, Kariya', 'Japan', 1),
    (3, 2, 'AutoDealer LLC', '12 Industrial St, Kazan', 'Russia', 1),
    (4, 3, 'Garage Works', '7 Depot Lane, Tver', 'Russia', 0);

INSERT INTO product (product_id, product_name, product_description, product_sale_price) VALUES
    (1, 'Brake pads', 'Front axle, ceramic', 45.50),
    (2, 'Oil filter', NULL, 12.00),
    (3, 'Spark plug', 'Iridium', 8.75),
    (4, 'Air filter', NULL, 15.20),
    (5, 'Timing belt', 'Reinforced', 60.00);

INSERT INTO employee (employee_id, employee_position_id, employee_name, employee_surname, employee_patronymic, employee_phone, employee_email, hire_date, fire_date) VALUES
    (1, 1, 'Anna', 'Ivanova', 'Sergeevna', '+7 900 111-22-33', 'ivanova@shop.example', '2020-01-15', NULL),
    (2, 2, 'Oleg', 'Petrov', NULL, '+7 900 222-33-44', NULL, '2021-06-01', NULL),
    (3, 3, 'Ivan', 'Sidorov', 'Petrovich', NULL, NULL, '2019-09-10', NULL);

INSERT INTO customer (customer_id, customer_name, customer_surname, customer_patronymic, customer_phone, customer_email) VALUES
    (1, 'Pavel', 'Smirnov', 'Andreevich', '+7 911 000-00-01', 'smirnov@mail.example'),
    (2, 'Maria', 'Kuznetsova', NULL, '+7 911 000-00-02', NULL),
    (3, 'Dmitry', 'Volkov', NULL, NULL, NULL);

INSERT INTO storage_cell (cell_id, cell_name, location_description, width, depth, height, max_weight) VALUES
    (1, 'A1', 'Aisle A, lower shelf', 1.20, 0.60, 0.50, 200),
    (2, 'A2', 'Aisle A, upper shelf', 1.20, 0.60, 0.40, 80),
    (3, 'B1', 'Aisle B', 2.00, 0.80, 1.00, NULL);

INSERT INTO delivery_term (dt_supplier_id, dt_product_id, delivery_price, delivery_days) VALUES
    (1, 1, 30.00, 5),
    (1, 3, 5.00, 5),
    (2, 1, 28.00, 10),
    (2, 2, 7.50, 7),
    (3, 2, 8.00, 3),
    (3, 4, 9.00, 3),
    (4, 5, 40.00, 14);

INSERT INTO supplier_contract (contract_id, contract_supplier_id, contract_number, start_date, end_date, terms, discount) VALUES
    (1, 1, 'BP-2024-01', '2024-01-01', '2024-12-31', 'Quarterly volume bonus', 5.00),
    (2, 2, 'DN-17', '2023-06-01', NULL, NULL, 3.50);

INSERT INTO supplier_order (supplier_order_id, manager_id, recipient_id, supplier_order_date, expected_delivery_date, supplier_order_description, supplier_order_status) VALUES
    (1, 1, 1, '2024-01-10 09:00:00', '2024-01-20', NULL, 1),
    (2, 1, 2, '2024-02-01 11:30:00', '2024-02-15', 'Brake pads restock', 1),
    (3, 1, 3, '2024-03-05 14:00:00', '2024-03-20', NULL, 0);

INSERT INTO supplier_order_item (soi_supplier_order_id, soi_product_id, soi_quantity) VALUES
    (1, 1, 100),
    (1, 3, 200),
    (2, 1, 50),
    (2, 2, 80),
    (3, 4, 40);

INSERT INTO batch (batch_id, batch_supplier_order_id, delivery_date, batch_description) VALUES
    (1, 1, '2024-01-18 10:00:00', NULL),
    (2, 2, '2024-02-12 16:20:00', 'Two cartons damaged in transit');

INSERT INTO batch_item (batch_item_id, bi_batch_id, bi_product_id, bi_cell_id, batch_item_quantity, remaining_item) VALUES
    (1, 1, 1, 1, 100, 90),
    (2, 1, 3, 2, 200, 195),
    (3, 2, 1, 1, 50, 48),
    (4, 2, 2, 2, 80, 75);

INSERT INTO stock_item (stock_batch_item_id, stock_storage_cell_id, stock_item_quantity) VALUES
    (1, 1, 90),
    (2, 2, 195),
    (3, 1, 48),
    (4, 2, 75);

INSERT INTO custom_payment (custom_payment_id, cp_batch_id, payment_amount, payment_date) VALUES
    (1, 1, 120.00, '2024-01-19 12:00:00'),
    (2, 2, 95.50, '2024-02-13 09:45:00');

INSERT INTO customer_order (customer_order_id, co_customer_id, customer_order_date, customer_order_status, customer_order_description) VALUES
    (1, 3, '2024-03-02 13:00:00', 0, 'Call when the belt arrives'),
    (2, 1, '2024-02-10 10:15:00', 1, NULL);

INSERT INTO customer_order_item (coi_customer_order_id, coi_product_id, coi_quantity) VALUES
    (1, 5, 2),
    (1, 4, 1),
    (2, 1, 4);

INSERT INTO sale (sale_id, sale_customer_id, sale_employee_id, sale_customer_order_id, sale_date, is_order_fulfillment) VALUES
    (1, 1, 2, 2, '2024-02-15 10:00:00', 1),
    (2, 2, 2, NULL, '2024-02-20 15:30:00', 0),
    (3, 1, 1, NULL, '2024-03-01 11:10:00', 0);

INSERT INTO sale_item (sale_item_id, si_sale_id, si_batch_item_id, si_quantity) VALUES
    (1, 1, 1, 4),
    (2, 1, 2, 5),
    (3, 2, 3, 2),
    (4, 2, 4, 5),
    (5, 3, 1, 6);

INSERT INTO customer_refund (customer_refund_id, cr_sale_item_id, cr_quantity, refund_date, refund_amount, is_defect) VALUES
    (1, 2, 1, '2024-02-18 17:00:00', 8.75, 1);

INSERT INTO defect (defect_id, defect_batch_item_id, detection_date, defect_quantity, defect_description) VALUES
    (1, 2, '2024-02-18 17:05:00', 1, 'Cracked insulator');

INSERT INTO supplier_return (supplier_return_id, sr_defect_id, return_date, return_quantity, compensation_amount, replacement_compensation) VALUES
    (1, 1, '2024-02-25', 1, 5.00, 0);
"#;

/// Insert the demo data in one transaction
pub(super) fn insert_demo(conn: &mut Connection) -> rusqlite::Result<SeedStats> {
    let tx = conn.transaction()?;
    tx.execute_batch(DEMO_SQL)?;

    let mut stats = SeedStats::default();
    for table in ENTITY_TABLES {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", table);
        let n: i64 = tx.query_row(&sql, [], |row| row.get(0))?;
        if n > 0 {
            stats.tables += 1;
            stats.records += n;
        }
    }

    tx.commit()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use crate::store::Store;

    #[test]
    fn test_demo_fills_every_table() {
        let store = Store::open_in_memory().unwrap();
        let stats = store.seed_demo().unwrap();

        assert_eq!(stats.tables, super::ENTITY_TABLES.len());
        assert!(store.table_counts().unwrap().iter().all(|(_, n)| *n > 0));
    }

    #[test]
    fn test_demo_remaining_matches_sales() {
        let store = Store::open_in_memory().unwrap();
        store.seed_demo().unwrap();

        let mismatched = store
            .query(
                "SELECT bi.batch_item_id FROM batch_item bi
                 WHERE bi.remaining_item != bi.batch_item_quantity
                     - (SELECT COALESCE(SUM(si_quantity), 0) FROM sale_item WHERE si_batch_item_id = bi.batch_item_id)",
                [],
            )
            .unwrap();
        assert!(mismatched.is_empty());
    }
}
