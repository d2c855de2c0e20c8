//! The join lesson, one step per example query.

use super::{JoinTopic, LessonStep};

pub(super) const CRM_STEPS: &[LessonStep] = &[
    LessonStep {
        id: "preview-orderdetails",
        title: "Previewing a table",
        topic: JoinTopic::Preview,
        narrative: "Each row of orderdetails records one product on one order, but only by \
                    its productCode. To see what was actually ordered we need the products \
                    table as well.",
        sql: "SELECT * FROM orderdetails;",
    },
    LessonStep {
        id: "inner-join-on",
        title: "INNER JOIN with ON",
        topic: JoinTopic::InnerJoin,
        narrative: "JOIN (short for INNER JOIN) pairs every orderdetails row with the \
                    products row whose productCode matches. The ON clause names the key on \
                    both sides, so productCode appears twice in the output.",
        sql: "SELECT * \
              FROM orderdetails \
              JOIN products ON orderdetails.productCode = products.productCode \
              LIMIT 10;",
    },
    LessonStep {
        id: "inner-join-using",
        title: "Joining with USING",
        topic: JoinTopic::Using,
        narrative: "When the key column has the same name in both tables, USING(productCode) \
                    says the same thing more briefly and merges the two key columns into one.",
        sql: "SELECT * \
              FROM orderdetails \
              JOIN products USING(productCode) \
              LIMIT 10;",
    },
    LessonStep {
        id: "table-aliases",
        title: "Aliasing tables",
        topic: JoinTopic::Aliasing,
        narrative: "AS gives a table a short name for the rest of the query. The result is \
                    exactly the same as the unaliased ON join.",
        sql: "SELECT * \
              FROM orderdetails AS od \
              JOIN products AS p ON od.productCode = p.productCode \
              LIMIT 10;",
    },
    LessonStep {
        id: "aliases-without-as",
        title: "Aliasing without AS",
        topic: JoinTopic::Aliasing,
        narrative: "The AS keyword is optional; an alias can follow the table name directly, \
                    and aliases combine freely with USING.",
        sql: "SELECT * \
              FROM orderdetails od \
              JOIN products p USING(productCode) \
              LIMIT 10;",
    },
    LessonStep {
        id: "left-join",
        title: "LEFT JOIN",
        topic: JoinTopic::LeftJoin,
        narrative: "A LEFT JOIN keeps every row of the left table. Products that were never \
                    ordered still appear once, with NULL in every orderdetails column, so \
                    the result has at least as many rows as products does.",
        sql: "SELECT * \
              FROM products \
              LEFT JOIN orderdetails USING(productCode) \
              ORDER BY orderNumber IS NULL, productCode;",
    },
    LessonStep {
        id: "never-ordered",
        title: "Finding unmatched rows",
        topic: JoinTopic::LeftJoin,
        narrative: "Filtering a LEFT JOIN on a NULL right-hand key leaves exactly the left \
                    rows without a partner: here, the products nobody has ordered.",
        sql: "SELECT p.productCode, p.productName, p.productLine \
              FROM products AS p \
              LEFT JOIN orderdetails AS od ON p.productCode = od.productCode \
              WHERE od.orderNumber IS NULL \
              ORDER BY p.productCode;",
    },
    LessonStep {
        id: "foreign-key-join",
        title: "Joining on a foreign key",
        topic: JoinTopic::ForeignKey,
        narrative: "employeeNumber is the primary key of employees, but in customers the \
                    same value lives in salesRepEmployeeNumber, a foreign key. Column names \
                    differ, so USING cannot be used. A rep with several customers shows up \
                    once per customer: foreign keys are not unique.",
        sql: "SELECT e.employeeNumber, e.lastName, e.firstName, \
                     c.customerNumber, c.customerName \
              FROM employees AS e \
              JOIN customers AS c ON e.employeeNumber = c.salesRepEmployeeNumber \
              ORDER BY e.employeeNumber, c.customerNumber;",
    },
    LessonStep {
        id: "mismatched-keys",
        title: "Pitfall: joining the wrong keys",
        topic: JoinTopic::ForeignKey,
        narrative: "Joining two primary keys that merely look alike is valid SQL but means \
                    nothing. employeeNumber and customerNumber never coincide here, so the \
                    query runs fine and returns no rows at all.",
        sql: "SELECT e.employeeNumber, e.lastName, c.customerNumber, c.customerName \
              FROM employees AS e \
              JOIN customers AS c ON e.employeeNumber = c.customerNumber;",
    },
    LessonStep {
        id: "customers-with-reps",
        title: "Customers and their sales reps",
        topic: JoinTopic::ForeignKey,
        narrative: "Starting from customers with a LEFT JOIN keeps the customer that has no \
                    sales rep, which an inner join on the same foreign key silently drops.",
        sql: "SELECT c.customerNumber, c.customerName, \
                     e.employeeNumber, e.lastName AS repLastName \
              FROM customers AS c \
              LEFT JOIN employees AS e ON c.salesRepEmployeeNumber = e.employeeNumber \
              ORDER BY c.customerNumber;",
    },
];
