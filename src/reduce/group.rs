/// Running state of one group while reducing.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    order: usize,
    total: f64,
    code: String,
}

impl Group {
    /// `order` is the position in which the group was first seen and `code`
    /// the side value of that first record; later records don't change it.
    pub fn new(order: usize, code: &str) -> Group {
        Group {
            order,
            total: 0.0,
            code: code.to_string(),
        }
    }

    pub fn update(&mut self, value: f64) {
        self.total += value;
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn into_code(self) -> String {
        self.code
    }
}
