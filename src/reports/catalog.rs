//! The report catalog

use super::{ReportDefinition, ReportParam, ReportVariation};
use crate::core::ColumnKind::Integer;

const PRODUCT: ReportParam =
    ReportParam::choice("product", "Product", "products", "product_id", "product_name");
const CATEGORY: ReportParam = ReportParam::choice(
    "category",
    "Supplier category",
    "supplier-categories",
    "category_id",
    "category_name",
);
const SUPPLIER: ReportParam =
    ReportParam::choice("supplier", "Supplier", "suppliers", "supplier_id", "supplier_name");
const CUSTOMER: ReportParam =
    ReportParam::choice("customer", "Customer", "customers", "customer_id", "full_name");
const EMPLOYEE: ReportParam =
    ReportParam::choice("employee", "Employee", "employees", "employee_id", "full_name");
const CELL: ReportParam =
    ReportParam::choice("cell", "Storage cell", "storage-cells", "cell_id", "cell_name");
const START: ReportParam = ReportParam::date("start", "Period start");
const END: ReportParam = ReportParam::date("end", "Period end");
const DAY: ReportParam = ReportParam::date("day", "Day");
const ON_DATE: ReportParam = ReportParam::date("date", "Date");
const MIN_QUANTITY: ReportParam = ReportParam::text("min_quantity", "Minimum quantity", Integer);
const LIMIT: ReportParam = ReportParam::text("limit", "Number of products", Integer);
const THRESHOLD: ReportParam = ReportParam::text("threshold", "Stock threshold", Integer);

pub static REPORTS: &[ReportDefinition] = &[
    ReportDefinition {
        name: "supplier-products",
        title: "Suppliers of a product",
        description: "Suppliers of a given category delivering a given product",
        variations: &[
            ReportVariation {
                name: "by-category",
                title: "All suppliers of the category",
                description: "Every supplier of the category with delivery terms for the product",
                sql: r#"
                    SELECT supplier_name AS "Supplier", product_name AS "Product",
                           delivery_price AS "Price", delivery_days AS "Delivery days",
                           total_deliveries AS "Deliveries",
                           COALESCE(total_quantity, 0) AS "Quantity delivered"
                    FROM supplier_product_stat_view
                    WHERE product_id = :product AND supplier_category_id = :category
                    ORDER BY supplier_name"#,
                params: &[PRODUCT, CATEGORY],
            },
            ReportVariation {
                name: "min-volume",
                title: "Minimum volume in a period",
                description: "Suppliers that delivered at least the given quantity in the period",
                sql: r#"
                    SELECT sp.supplier_name AS "Supplier", sp.product_name AS "Product",
                           sp.category_name AS "Category", sp.delivery_price AS "Price",
                           sp.delivery_days AS "Delivery days", COUNT(*) AS "Deliveries",
                           SUM(bv.product_quantity) AS "Quantity in period"
                    FROM supplier_product_stat_view sp
                    JOIN batch_info_view bv
                      ON bv.supplier_id = sp.supplier_id AND bv.product_id = sp.product_id
                    WHERE sp.product_id = :product AND sp.supplier_category_id = :category
                      AND date(bv.delivery_date) BETWEEN :start AND :end
                    GROUP BY sp.supplier_id, sp.supplier_name, sp.product_name, sp.category_name,
                             sp.delivery_price, sp.delivery_days
                    HAVING SUM(bv.product_quantity) >= :min_quantity
                    ORDER BY sp.supplier_name"#,
                params: &[PRODUCT, CATEGORY, MIN_QUANTITY, START, END],
            },
        ],
    },
    ReportDefinition {
        name: "product-suppliers",
        title: "Delivery terms for a product",
        description: "Prices and delivery times offered for a product",
        variations: &[
            ReportVariation {
                name: "all-terms",
                title: "All offers",
                description: "Every supplier's terms, cheapest first",
                sql: r#"
                    SELECT s.supplier_name AS "Supplier", c.category_name AS "Category",
                           dt.delivery_price AS "Price", dt.delivery_days AS "Delivery days",
                           p.product_sale_price AS "Sale price"
                    FROM delivery_term dt
                    JOIN supplier s ON s.supplier_id = dt.dt_supplier_id
                    JOIN supplier_category c ON c.category_id = s.supplier_category_id
                    JOIN product p ON p.product_id = dt.dt_product_id
                    WHERE dt.dt_product_id = :product
                    ORDER BY dt.delivery_price, dt.delivery_days"#,
                params: &[PRODUCT],
            },
            ReportVariation {
                name: "cheapest",
                title: "Cheapest supplier",
                description: "The lowest price, ties broken by delivery time",
                sql: r#"
                    SELECT s.supplier_name AS "Supplier", dt.delivery_price AS "Price",
                           dt.delivery_days AS "Delivery days",
                           ROUND(p.product_sale_price - dt.delivery_price, 2) AS "Margin"
                    FROM delivery_term dt
                    JOIN supplier s ON s.supplier_id = dt.dt_supplier_id
                    JOIN product p ON p.product_id = dt.dt_product_id
                    WHERE dt.dt_product_id = :product
                    ORDER BY dt.delivery_price, dt.delivery_days
                    LIMIT 1"#,
                params: &[PRODUCT],
            },
        ],
    },
    ReportDefinition {
        name: "product-customers",
        title: "Customers of a product",
        description: "Customers who bought a product in a period",
        variations: &[
            ReportVariation {
                name: "in-period",
                title: "All buyers",
                description: "Every customer who bought the product in the period",
                sql: r#"
                    SELECT c.customer_surname || ' ' || c.customer_name AS "Customer",
                           c.customer_phone AS "Phone", SUM(si.si_quantity) AS "Quantity",
                           COUNT(DISTINCT s.sale_id) AS "Purchases"
                    FROM sale s
                    JOIN customer c ON c.customer_id = s.sale_customer_id
                    JOIN sale_item si ON si.si_sale_id = s.sale_id
                    JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    WHERE bi.bi_product_id = :product
                      AND date(s.sale_date) BETWEEN :start AND :end
                    GROUP BY c.customer_id
                    ORDER BY 3 DESC, 1"#,
                params: &[PRODUCT, START, END],
            },
            ReportVariation {
                name: "min-quantity",
                title: "Bulk buyers",
                description: "Customers who bought at least the given quantity",
                sql: r#"
                    SELECT c.customer_surname || ' ' || c.customer_name AS "Customer",
                           c.customer_phone AS "Phone", SUM(si.si_quantity) AS "Quantity"
                    FROM sale s
                    JOIN customer c ON c.customer_id = s.sale_customer_id
                    JOIN sale_item si ON si.si_sale_id = s.sale_id
                    JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    WHERE bi.bi_product_id = :product
                      AND date(s.sale_date) BETWEEN :start AND :end
                    GROUP BY c.customer_id
                    HAVING SUM(si.si_quantity) >= :min_quantity
                    ORDER BY 3 DESC, 1"#,
                params: &[PRODUCT, START, END, MIN_QUANTITY],
            },
        ],
    },
    ReportDefinition {
        name: "stock",
        title: "Stock on hand",
        description: "Products available in storage",
        variations: &[
            ReportVariation {
                name: "all",
                title: "Whole warehouse",
                description: "Remaining quantity of every batch item, by product",
                sql: r#"
                    SELECT product_name AS "Product", cell_name AS "Cell", batch_id AS "Batch",
                           date(delivery_date) AS "Delivered", current_quantity AS "Quantity"
                    FROM available_product_on_storage_view
                    ORDER BY product_name, cell_name, batch_id"#,
                params: &[],
            },
            ReportVariation {
                name: "by-cell",
                title: "One storage cell",
                description: "Products currently held in a storage cell",
                sql: r#"
                    SELECT product_name AS "Product", batch_id AS "Batch",
                           date(delivery_date) AS "Delivered", current_quantity AS "Quantity"
                    FROM available_product_on_storage_view
                    WHERE cell_id = :cell
                    ORDER BY product_name, batch_id"#,
                params: &[CELL],
            },
        ],
    },
    ReportDefinition {
        name: "top-products",
        title: "Best-selling products",
        description: "Top N products by units sold",
        variations: &[
            ReportVariation {
                name: "all-time",
                title: "All time",
                description: "Units sold and revenue since the first sale",
                sql: r#"
                    SELECT p.product_name AS "Product", SUM(si.si_quantity) AS "Sold",
                           ROUND(SUM(si.si_quantity * p.product_sale_price), 2) AS "Revenue"
                    FROM sale_item si
                    JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    JOIN product p ON p.product_id = bi.bi_product_id
                    GROUP BY p.product_id
                    ORDER BY 2 DESC, 1
                    LIMIT :limit"#,
                params: &[LIMIT],
            },
            ReportVariation {
                name: "in-period",
                title: "In a period",
                description: "Units sold and revenue within the period",
                sql: r#"
                    SELECT p.product_name AS "Product", SUM(si.si_quantity) AS "Sold",
                           ROUND(SUM(si.si_quantity * p.product_sale_price), 2) AS "Revenue"
                    FROM sale s
                    JOIN sale_item si ON si.si_sale_id = s.sale_id
                    JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    JOIN product p ON p.product_id = bi.bi_product_id
                    WHERE date(s.sale_date) BETWEEN :start AND :end
                    GROUP BY p.product_id
                    ORDER BY 2 DESC, 1
                    LIMIT :limit"#,
                params: &[LIMIT, START, END],
            },
        ],
    },
    ReportDefinition {
        name: "supplier-stats",
        title: "Supplier sales share",
        description: "Average sale price and share of sold units coming from a supplier",
        variations: &[
            ReportVariation {
                name: "share",
                title: "All time",
                description: "Share of every unit sold",
                sql: r#"
                    SELECT v.supplier_name AS "Supplier", SUM(v.sale_quantity) AS "Units sold",
                           ROUND(AVG(v.sale_price), 2) AS "Average price",
                           ROUND(100.0 * SUM(v.sale_quantity)
                                 / (SELECT SUM(sale_quantity) FROM sale_with_supplier_info_view), 2)
                               AS "Share, %"
                    FROM sale_with_supplier_info_view v
                    WHERE v.supplier_id = :supplier
                    GROUP BY v.supplier_id, v.supplier_name"#,
                params: &[SUPPLIER],
            },
            ReportVariation {
                name: "in-period",
                title: "In a period",
                description: "Share of the units sold within the period",
                sql: r#"
                    SELECT v.supplier_name AS "Supplier", SUM(v.sale_quantity) AS "Units sold",
                           ROUND(AVG(v.sale_price), 2) AS "Average price",
                           ROUND(100.0 * SUM(v.sale_quantity)
                                 / (SELECT SUM(sale_quantity) FROM sale_with_supplier_info_view
                                    WHERE date(sale_date) BETWEEN :start AND :end), 2)
                               AS "Share, %"
                    FROM sale_with_supplier_info_view v
                    WHERE v.supplier_id = :supplier
                      AND date(v.sale_date) BETWEEN :start AND :end
                    GROUP BY v.supplier_id, v.supplier_name"#,
                params: &[SUPPLIER, START, END],
            },
        ],
    },
    ReportDefinition {
        name: "sales-by-day",
        title: "Daily sales",
        description: "Number of sales and revenue per day",
        variations: &[
            ReportVariation {
                name: "period",
                title: "Per day in a period",
                description: "One line per day with at least one sale",
                sql: r#"
                    SELECT date(s.sale_date) AS "Day", COUNT(DISTINCT s.sale_id) AS "Sales",
                           COALESCE(SUM(si.si_quantity), 0) AS "Units",
                           ROUND(COALESCE(SUM(si.si_quantity * p.product_sale_price), 0), 2) AS "Revenue"
                    FROM sale s
                    LEFT JOIN sale_item si ON si.si_sale_id = s.sale_id
                    LEFT JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    LEFT JOIN product p ON p.product_id = bi.bi_product_id
                    WHERE date(s.sale_date) BETWEEN :start AND :end
                    GROUP BY date(s.sale_date)
                    ORDER BY 1"#,
                params: &[START, END],
            },
            ReportVariation {
                name: "day",
                title: "Single day",
                description: "Products sold on one day",
                sql: r#"
                    SELECT p.product_name AS "Product", SUM(si.si_quantity) AS "Units",
                           ROUND(SUM(si.si_quantity * p.product_sale_price), 2) AS "Revenue"
                    FROM sale s
                    JOIN sale_item si ON si.si_sale_id = s.sale_id
                    JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    JOIN product p ON p.product_id = bi.bi_product_id
                    WHERE date(s.sale_date) = :day
                    GROUP BY p.product_id
                    ORDER BY 1"#,
                params: &[DAY],
            },
        ],
    },
    ReportDefinition {
        name: "profit",
        title: "Profit",
        description: "Revenue, purchase cost and profit of sold goods",
        variations: &[
            ReportVariation {
                name: "per-supplier",
                title: "Per supplier",
                description: "Profit on goods from each supplier in the period",
                sql: r#"
                    SELECT supplier_name AS "Supplier", SUM(sale_quantity) AS "Units",
                           ROUND(SUM(sale_quantity * sale_price), 2) AS "Revenue",
                           ROUND(SUM(sale_quantity * purchase_price), 2) AS "Cost",
                           ROUND(SUM(profit), 2) AS "Profit"
                    FROM sale_with_supplier_info_view
                    WHERE date(sale_date) BETWEEN :start AND :end
                    GROUP BY supplier_id
                    ORDER BY 5 DESC"#,
                params: &[START, END],
            },
            ReportVariation {
                name: "per-product",
                title: "Per product",
                description: "Profit on each product in the period",
                sql: r#"
                    SELECT product_name AS "Product", SUM(sale_quantity) AS "Units",
                           ROUND(SUM(sale_quantity * sale_price), 2) AS "Revenue",
                           ROUND(SUM(sale_quantity * purchase_price), 2) AS "Cost",
                           ROUND(SUM(profit), 2) AS "Profit"
                    FROM sale_with_supplier_info_view
                    WHERE date(sale_date) BETWEEN :start AND :end
                    GROUP BY product_id
                    ORDER BY 5 DESC"#,
                params: &[START, END],
            },
        ],
    },
    ReportDefinition {
        name: "defects",
        title: "Defective goods",
        description: "Defects found in delivered batches, with their supplier",
        variations: &[
            ReportVariation {
                name: "all",
                title: "All defects",
                description: "Every recorded defect",
                sql: r#"
                    SELECT product_name AS "Product", supplier_name AS "Supplier",
                           date(batch_delivery_date) AS "Delivered",
                           date(detection_date) AS "Detected", defect_quantity AS "Quantity",
                           defect_description AS "Description"
                    FROM defective_item_view
                    ORDER BY detection_date"#,
                params: &[],
            },
            ReportVariation {
                name: "period",
                title: "In a period",
                description: "Defects detected within the period",
                sql: r#"
                    SELECT product_name AS "Product", supplier_name AS "Supplier",
                           date(detection_date) AS "Detected", defect_quantity AS "Quantity",
                           defect_description AS "Description"
                    FROM defective_item_view
                    WHERE date(detection_date) BETWEEN :start AND :end
                    ORDER BY detection_date"#,
                params: &[START, END],
            },
        ],
    },
    ReportDefinition {
        name: "refunds",
        title: "Customer refunds",
        description: "Money returned to customers",
        variations: &[
            ReportVariation {
                name: "period",
                title: "In a period",
                description: "Every refund within the period",
                sql: r#"
                    SELECT date(cr.refund_date) AS "Date", p.product_name AS "Product",
                           cr.cr_quantity AS "Quantity", cr.refund_amount AS "Amount",
                           CASE WHEN cr.is_defect THEN 'yes' ELSE 'no' END AS "Defective"
                    FROM customer_refund cr
                    JOIN sale_item si ON si.sale_item_id = cr.cr_sale_item_id
                    JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    JOIN product p ON p.product_id = bi.bi_product_id
                    WHERE date(cr.refund_date) BETWEEN :start AND :end
                    ORDER BY cr.refund_date"#,
                params: &[START, END],
            },
            ReportVariation {
                name: "defective",
                title: "Caused by defects",
                description: "Refunds for defective goods within the period",
                sql: r#"
                    SELECT date(cr.refund_date) AS "Date", p.product_name AS "Product",
                           cr.cr_quantity AS "Quantity", cr.refund_amount AS "Amount"
                    FROM customer_refund cr
                    JOIN sale_item si ON si.sale_item_id = cr.cr_sale_item_id
                    JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    JOIN product p ON p.product_id = bi.bi_product_id
                    WHERE cr.is_defect = 1
                      AND date(cr.refund_date) BETWEEN :start AND :end
                    ORDER BY cr.refund_date"#,
                params: &[START, END],
            },
        ],
    },
    ReportDefinition {
        name: "customer-orders",
        title: "Customer orders",
        description: "Goods customers are waiting for",
        variations: &[
            ReportVariation {
                name: "open",
                title: "Open orders by product",
                description: "Total quantity of each product on unfulfilled orders",
                sql: r#"
                    SELECT product_name AS "Product", total_ordered AS "Ordered"
                    FROM customer_orders_product_view
                    ORDER BY 2 DESC, 1"#,
                params: &[],
            },
            ReportVariation {
                name: "customer",
                title: "One customer",
                description: "Every order line of a customer",
                sql: r#"
                    SELECT co.customer_order_id AS "Order", date(co.customer_order_date) AS "Date",
                           p.product_name AS "Product", coi.coi_quantity AS "Quantity",
                           CASE WHEN co.customer_order_status THEN 'fulfilled' ELSE 'open' END AS "Status"
                    FROM customer_order co
                    JOIN customer_order_item coi ON coi.coi_customer_order_id = co.customer_order_id
                    JOIN product p ON p.product_id = coi.coi_product_id
                    WHERE co.co_customer_id = :customer
                    ORDER BY co.customer_order_date, p.product_name"#,
                params: &[CUSTOMER],
            },
        ],
    },
    ReportDefinition {
        name: "supplier-orders",
        title: "Supplier orders",
        description: "Orders placed with suppliers",
        variations: &[
            ReportVariation {
                name: "open",
                title: "Open orders",
                description: "Orders not yet completed, by expected delivery",
                sql: r#"
                    SELECT so.supplier_order_id AS "Order", s.supplier_name AS "Supplier",
                           date(so.supplier_order_date) AS "Ordered",
                           so.expected_delivery_date AS "Expected",
                           COUNT(soi.soi_product_id) AS "Lines",
                           COALESCE(SUM(soi.soi_quantity), 0) AS "Units"
                    FROM supplier_order so
                    JOIN supplier s ON s.supplier_id = so.recipient_id
                    LEFT JOIN supplier_order_item soi ON soi.soi_supplier_order_id = so.supplier_order_id
                    WHERE so.supplier_order_status = 0
                    GROUP BY so.supplier_order_id
                    ORDER BY so.expected_delivery_date"#,
                params: &[],
            },
            ReportVariation {
                name: "supplier",
                title: "One supplier",
                description: "Every order placed with a supplier",
                sql: r#"
                    SELECT so.supplier_order_id AS "Order", date(so.supplier_order_date) AS "Ordered",
                           so.expected_delivery_date AS "Expected",
                           COALESCE(SUM(soi.soi_quantity), 0) AS "Units",
                           CASE WHEN so.supplier_order_status THEN 'completed' ELSE 'open' END AS "Status"
                    FROM supplier_order so
                    LEFT JOIN supplier_order_item soi ON soi.soi_supplier_order_id = so.supplier_order_id
                    WHERE so.recipient_id = :supplier
                    GROUP BY so.supplier_order_id
                    ORDER BY so.supplier_order_date"#,
                params: &[SUPPLIER],
            },
        ],
    },
    ReportDefinition {
        name: "cash-report",
        title: "Cash report",
        description: "Sales, refunds and net revenue",
        variations: &[
            ReportVariation {
                name: "period",
                title: "For a period",
                description: "Totals over the period",
                sql: r#"
                    WITH sales AS (
                        SELECT COUNT(*) AS n FROM sale
                        WHERE date(sale_date) BETWEEN :start AND :end
                    ), revenue AS (
                        SELECT ROUND(COALESCE(SUM(si.si_quantity * p.product_sale_price), 0), 2) AS total
                        FROM sale s
                        JOIN sale_item si ON si.si_sale_id = s.sale_id
                        JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                        JOIN product p ON p.product_id = bi.bi_product_id
                        WHERE date(s.sale_date) BETWEEN :start AND :end
                    ), refunds AS (
                        SELECT ROUND(COALESCE(SUM(refund_amount), 0), 2) AS total
                        FROM customer_refund
                        WHERE date(refund_date) BETWEEN :start AND :end
                    )
                    SELECT sales.n AS "Sales", revenue.total AS "Revenue",
                           refunds.total AS "Refunds",
                           ROUND(revenue.total - refunds.total, 2) AS "Net"
                    FROM sales, revenue, refunds"#,
                params: &[START, END],
            },
            ReportVariation {
                name: "day",
                title: "For one day",
                description: "Totals for a single day",
                sql: r#"
                    WITH sales AS (
                        SELECT COUNT(*) AS n FROM sale WHERE date(sale_date) = :day
                    ), revenue AS (
                        SELECT ROUND(COALESCE(SUM(si.si_quantity * p.product_sale_price), 0), 2) AS total
                        FROM sale s
                        JOIN sale_item si ON si.si_sale_id = s.sale_id
                        JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                        JOIN product p ON p.product_id = bi.bi_product_id
                        WHERE date(s.sale_date) = :day
                    ), refunds AS (
                        SELECT ROUND(COALESCE(SUM(refund_amount), 0), 2) AS total
                        FROM customer_refund WHERE date(refund_date) = :day
                    )
                    SELECT sales.n AS "Sales", revenue.total AS "Revenue",
                           refunds.total AS "Refunds",
                           ROUND(revenue.total - refunds.total, 2) AS "Net"
                    FROM sales, revenue, refunds"#,
                params: &[DAY],
            },
        ],
    },
    ReportDefinition {
        name: "inventory",
        title: "Inventory",
        description: "Delivered, sold, defective and remaining units per product",
        variations: &[
            ReportVariation {
                name: "all",
                title: "All products",
                description: "Stock movement of every product",
                sql: r#"
                    SELECT p.product_name AS "Product",
                           COALESCE((SELECT SUM(bi.batch_item_quantity) FROM batch_item bi
                                     WHERE bi.bi_product_id = p.product_id), 0) AS "Delivered",
                           COALESCE((SELECT SUM(si.si_quantity) FROM sale_item si
                                     JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                                     WHERE bi.bi_product_id = p.product_id), 0) AS "Sold",
                           COALESCE((SELECT SUM(d.defect_quantity) FROM defect d
                                     JOIN batch_item bi ON bi.batch_item_id = d.defect_batch_item_id
                                     WHERE bi.bi_product_id = p.product_id), 0) AS "Defective",
                           COALESCE((SELECT SUM(bi.remaining_item) FROM batch_item bi
                                     WHERE bi.bi_product_id = p.product_id), 0) AS "Remaining"
                    FROM product p
                    ORDER BY p.product_name"#,
                params: &[],
            },
            ReportVariation {
                name: "low-stock",
                title: "Low stock",
                description: "Products with fewer remaining units than the threshold",
                sql: r#"
                    SELECT * FROM (
                        SELECT p.product_id AS "ID", p.product_name AS "Product",
                               COALESCE((SELECT SUM(bi.remaining_item) FROM batch_item bi
                                         WHERE bi.bi_product_id = p.product_id), 0) AS "Remaining",
                               COALESCE((SELECT SUM(coi.coi_quantity) FROM customer_order_item coi
                                         JOIN customer_order co
                                           ON co.customer_order_id = coi.coi_customer_order_id
                                         WHERE coi.coi_product_id = p.product_id
                                           AND co.customer_order_status = 0), 0) AS "On order"
                        FROM product p
                    )
                    WHERE "Remaining" < :threshold
                    ORDER BY "ID""#,
                params: &[THRESHOLD],
            },
        ],
    },
    ReportDefinition {
        name: "storage-cells",
        title: "Storage cells",
        description: "Occupancy of the warehouse cells",
        variations: &[
            ReportVariation {
                name: "occupancy",
                title: "All cells",
                description: "Batch items and units held in each cell",
                sql: r#"
                    SELECT sc.cell_name AS "Cell", sc.location_description AS "Location",
                           COUNT(bi.batch_item_id) AS "Batch items",
                           COALESCE(SUM(bi.remaining_item), 0) AS "Units",
                           sc.max_weight AS "Max weight"
                    FROM storage_cell sc
                    LEFT JOIN batch_item bi
                      ON bi.bi_cell_id = sc.cell_id AND COALESCE(bi.remaining_item, 0) > 0
                    GROUP BY sc.cell_id
                    ORDER BY sc.cell_name"#,
                params: &[],
            },
            ReportVariation {
                name: "empty",
                title: "Empty cells",
                description: "Cells holding no remaining goods",
                sql: r#"
                    SELECT sc.cell_name AS "Cell", sc.location_description AS "Location",
                           sc.width AS "Width", sc.depth AS "Depth", sc.height AS "Height"
                    FROM storage_cell sc
                    LEFT JOIN batch_item bi
                      ON bi.bi_cell_id = sc.cell_id AND COALESCE(bi.remaining_item, 0) > 0
                    GROUP BY sc.cell_id
                    HAVING COUNT(bi.batch_item_id) = 0
                    ORDER BY sc.cell_name"#,
                params: &[],
            },
        ],
    },
    ReportDefinition {
        name: "employee-sales",
        title: "Sales by employee",
        description: "Sales handled by each employee",
        variations: &[
            ReportVariation {
                name: "period",
                title: "All employees",
                description: "Number of sales and revenue per employee in the period",
                sql: r#"
                    SELECT e.employee_surname || ' ' || e.employee_name AS "Employee",
                           pos.position_name AS "Position",
                           COUNT(DISTINCT s.sale_id) AS "Sales",
                           ROUND(COALESCE(SUM(si.si_quantity * p.product_sale_price), 0), 2) AS "Revenue"
                    FROM employee e
                    JOIN position pos ON pos.position_id = e.employee_position_id
                    LEFT JOIN sale s ON s.sale_employee_id = e.employee_id
                                    AND date(s.sale_date) BETWEEN :start AND :end
                    LEFT JOIN sale_item si ON si.si_sale_id = s.sale_id
                    LEFT JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    LEFT JOIN product p ON p.product_id = bi.bi_product_id
                    GROUP BY e.employee_id
                    ORDER BY 4 DESC, 1"#,
                params: &[START, END],
            },
            ReportVariation {
                name: "employee",
                title: "One employee",
                description: "Sales handled by an employee in the period",
                sql: r#"
                    SELECT s.sale_id AS "Sale", s.sale_date AS "Date",
                           c.customer_surname || ' ' || c.customer_name AS "Customer",
                           ROUND(COALESCE(SUM(si.si_quantity * p.product_sale_price), 0), 2) AS "Total"
                    FROM sale s
                    JOIN customer c ON c.customer_id = s.sale_customer_id
                    LEFT JOIN sale_item si ON si.si_sale_id = s.sale_id
                    LEFT JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                    LEFT JOIN product p ON p.product_id = bi.bi_product_id
                    WHERE s.sale_employee_id = :employee
                      AND date(s.sale_date) BETWEEN :start AND :end
                    GROUP BY s.sale_id
                    ORDER BY s.sale_date"#,
                params: &[EMPLOYEE, START, END],
            },
        ],
    },
    ReportDefinition {
        name: "customer-stats",
        title: "Customer statistics",
        description: "What customers buy and spend",
        variations: &[
            ReportVariation {
                name: "all",
                title: "All customers",
                description: "Distinct products, units and spend per customer",
                sql: r#"
                    SELECT customer_surname || ' ' || customer_name AS "Customer",
                           COUNT(product_id) AS "Products", SUM(total_purchased) AS "Units",
                           ROUND(SUM(total_spent), 2) AS "Spent"
                    FROM customer_purchase_stat_view
                    GROUP BY customer_id
                    ORDER BY 4 DESC, 1"#,
                params: &[],
            },
            ReportVariation {
                name: "customer",
                title: "One customer",
                description: "Products bought by a customer",
                sql: r#"
                    SELECT product_name AS "Product", total_purchased AS "Units",
                           total_spent AS "Spent"
                    FROM customer_purchase_stat_view
                    WHERE customer_id = :customer
                    ORDER BY 3 DESC, 1"#,
                params: &[CUSTOMER],
            },
        ],
    },
    ReportDefinition {
        name: "supplier-contracts",
        title: "Supplier contracts",
        description: "Contracts with suppliers and their discounts",
        variations: &[
            ReportVariation {
                name: "active",
                title: "Active on a date",
                description: "Contracts in force on the given date",
                sql: r#"
                    SELECT s.supplier_name AS "Supplier", sc.contract_number AS "Contract",
                           sc.start_date AS "Start", sc.end_date AS "End",
                           sc.discount AS "Discount, %"
                    FROM supplier_contract sc
                    JOIN supplier s ON s.supplier_id = sc.contract_supplier_id
                    WHERE sc.start_date <= :date
                      AND (sc.end_date IS NULL OR sc.end_date >= :date)
                    ORDER BY 1, 2"#,
                params: &[ON_DATE],
            },
            ReportVariation {
                name: "supplier",
                title: "One supplier",
                description: "Every contract signed with a supplier",
                sql: r#"
                    SELECT sc.contract_number AS "Contract", sc.start_date AS "Start",
                           sc.end_date AS "End", sc.discount AS "Discount, %",
                           sc.terms AS "Terms"
                    FROM supplier_contract sc
                    WHERE sc.contract_supplier_id = :supplier
                    ORDER BY sc.start_date"#,
                params: &[SUPPLIER],
            },
        ],
    },
    ReportDefinition {
        name: "turnover",
        title: "Product turnover",
        description: "Units delivered against units sold",
        variations: &[
            ReportVariation {
                name: "period",
                title: "All products",
                description: "Delivered and sold units per product in the period",
                sql: r#"
                    SELECT p.product_name AS "Product",
                           COALESCE((SELECT SUM(bv.product_quantity) FROM batch_info_view bv
                                     WHERE bv.product_id = p.product_id
                                       AND date(bv.delivery_date) BETWEEN :start AND :end), 0)
                               AS "Delivered",
                           COALESCE((SELECT SUM(si.si_quantity) FROM sale_item si
                                     JOIN sale s ON s.sale_id = si.si_sale_id
                                     JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                                     WHERE bi.bi_product_id = p.product_id
                                       AND date(s.sale_date) BETWEEN :start AND :end), 0)
                               AS "Sold"
                    FROM product p
                    ORDER BY p.product_name"#,
                params: &[START, END],
            },
            ReportVariation {
                name: "unsold",
                title: "Unsold products",
                description: "Products in stock with no sales in the period",
                sql: r#"
                    SELECT p.product_name AS "Product",
                           COALESCE(SUM(bi.remaining_item), 0) AS "Remaining"
                    FROM product p
                    JOIN batch_item bi ON bi.bi_product_id = p.product_id
                    WHERE NOT EXISTS (
                        SELECT 1 FROM sale_item si
                        JOIN sale s ON s.sale_id = si.si_sale_id
                        JOIN batch_item b2 ON b2.batch_item_id = si.si_batch_item_id
                        WHERE b2.bi_product_id = p.product_id
                          AND date(s.sale_date) BETWEEN :start AND :end
                    )
                    GROUP BY p.product_id
                    HAVING COALESCE(SUM(bi.remaining_item), 0) > 0
                    ORDER BY 1"#,
                params: &[START, END],
            },
        ],
    },
    ReportDefinition {
        name: "customs",
        title: "Customs payments",
        description: "Customs duties paid on delivered batches",
        variations: &[
            ReportVariation {
                name: "period",
                title: "Per batch",
                description: "Every payment made in the period",
                sql: r#"
                    SELECT b.batch_id AS "Batch", s.supplier_name AS "Supplier",
                           date(cp.payment_date) AS "Paid", cp.payment_amount AS "Amount"
                    FROM custom_payment cp
                    JOIN batch b ON b.batch_id = cp.cp_batch_id
                    JOIN supplier_order so ON so.supplier_order_id = b.batch_supplier_order_id
                    JOIN supplier s ON s.supplier_id = so.recipient_id
                    WHERE date(cp.payment_date) BETWEEN :start AND :end
                    ORDER BY cp.payment_date"#,
                params: &[START, END],
            },
            ReportVariation {
                name: "per-supplier",
                title: "Per supplier",
                description: "Payments in the period summed by supplier",
                sql: r#"
                    SELECT s.supplier_name AS "Supplier", COUNT(*) AS "Payments",
                           ROUND(SUM(cp.payment_amount), 2) AS "Total"
                    FROM custom_payment cp
                    JOIN batch b ON b.batch_id = cp.cp_batch_id
                    JOIN supplier_order so ON so.supplier_order_id = b.batch_supplier_order_id
                    JOIN supplier s ON s.supplier_id = so.recipient_id
                    WHERE date(cp.payment_date) BETWEEN :start AND :end
                    GROUP BY s.supplier_id
                    ORDER BY 3 DESC"#,
                params: &[START, END],
            },
        ],
    },
];
