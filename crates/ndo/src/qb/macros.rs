//! WHERE helpers shared by the SELECT / UPDATE / DELETE builders.

/// Implement the condition-tree builder methods on a type with a
/// `conds: Where` field.
macro_rules! impl_where_methods {
    ($ty:ty) => {
        impl $ty {
            /// Add WHERE: field = value
            pub fn eq(mut self, field: &str, value: impl Into<$crate::value::Value>) -> Self {
                self.conds
                    .push($crate::qb::Connective::And, $crate::qb::Cond::eq(field, value));
                self
            }

            /// Add WHERE: field <op> value
            pub fn compare(
                mut self,
                field: &str,
                op: &str,
                value: impl Into<$crate::value::Value>,
            ) -> Self {
                self.conds.push(
                    $crate::qb::Connective::And,
                    $crate::qb::Cond::compare(field, op, value),
                );
                self
            }

            /// Add WHERE: field <op> where `op` carries one `?` per value.
            pub fn compare_values<T: Into<$crate::value::Value>>(
                mut self,
                field: &str,
                op: &str,
                values: impl IntoIterator<Item = T>,
            ) -> Self {
                self.conds.push(
                    $crate::qb::Connective::And,
                    $crate::qb::Cond::compare_values(field, op, values),
                );
                self
            }

            /// Add WHERE: field BETWEEN low AND high
            pub fn between(
                mut self,
                field: &str,
                low: impl Into<$crate::value::Value>,
                high: impl Into<$crate::value::Value>,
            ) -> Self {
                self.conds.push(
                    $crate::qb::Connective::And,
                    $crate::qb::Cond::between(field, low, high),
                );
                self
            }

            /// Add WHERE: field <op> with nothing bound (e.g. `IS NULL`).
            pub fn operator(mut self, field: &str, op: &str) -> Self {
                self.conds
                    .push($crate::qb::Connective::And, $crate::qb::Cond::operator(field, op));
                self
            }

            /// Add WHERE: field IN (literal, ...). Values are embedded, not bound.
            pub fn in_list<T: Into<$crate::value::Value>>(
                mut self,
                field: &str,
                values: impl IntoIterator<Item = T>,
            ) -> Self {
                self.conds
                    .push($crate::qb::Connective::And, $crate::qb::Cond::in_list(field, values));
                self
            }

            /// Add WHERE: field <op> <raw sql>
            pub fn subquery(mut self, field: &str, op: &str, sql: &str) -> Self {
                self.conds.push(
                    $crate::qb::Connective::And,
                    $crate::qb::Cond::subquery(field, op, sql),
                );
                self
            }

            /// Add field = value to the trailing OR group.
            pub fn or_eq(mut self, field: &str, value: impl Into<$crate::value::Value>) -> Self {
                self.conds
                    .push($crate::qb::Connective::Or, $crate::qb::Cond::eq(field, value));
                self
            }

            /// Add a condition to the trailing AND group.
            pub fn and_cond(mut self, cond: $crate::qb::Cond) -> Self {
                self.conds.push($crate::qb::Connective::And, cond);
                self
            }

            /// Add a condition to the trailing OR group.
            pub fn or_cond(mut self, cond: $crate::qb::Cond) -> Self {
                self.conds.push($crate::qb::Connective::Or, cond);
                self
            }

            /// Replace the whole condition tree.
            pub fn filter(mut self, conds: $crate::qb::Where) -> Self {
                self.conds = conds;
                self
            }

            /// Replace the condition tree with its JSON descriptor form.
            pub fn filter_json(self, conds: &serde_json::Value) -> Self {
                self.filter($crate::qb::Where::from_json(conds))
            }

            pub fn conditions(&self) -> &$crate::qb::Where {
                &self.conds
            }
        }
    };
}
