//! PortfolioRepository — the process-wide collection of portfolios.
//!
//! An explicit object, passed by reference to everything that needs it;
//! there is no global portfolio list. Identity is the (name, owner) pair.

use crate::domain::Portfolio;
use crate::error::ModelError;

#[derive(Debug, Default)]
pub struct PortfolioRepository {
    portfolios: Vec<Portfolio>,
}

impl PortfolioRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty portfolio. Duplicate (name, owner) pairs are rejected.
    pub fn create(&mut self, name: &str, owner: &str) -> Result<&mut Portfolio, ModelError> {
        if self.position(name, owner).is_some() {
            return Err(ModelError::InvalidArgument(format!(
                "portfolio '{name}' owned by '{owner}' already exists"
            )));
        }
        self.portfolios.push(Portfolio::new(name, owner));
        Ok(self.portfolios.last_mut().unwrap())
    }

    /// Removes a portfolio; returns whether one was removed.
    pub fn remove(&mut self, name: &str, owner: &str) -> bool {
        match self.position(name, owner) {
            Some(pos) => {
                self.portfolios.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str, owner: &str) -> Result<&Portfolio, ModelError> {
        self.position(name, owner)
            .map(|pos| &self.portfolios[pos])
            .ok_or_else(|| not_found(name, owner))
    }

    pub fn get_mut(&mut self, name: &str, owner: &str) -> Result<&mut Portfolio, ModelError> {
        self.position(name, owner)
            .map(|pos| &mut self.portfolios[pos])
            .ok_or_else(|| not_found(name, owner))
    }

    /// Inserts a fully-built portfolio (e.g. loaded from a snapshot),
    /// replacing any existing portfolio with the same identity.
    pub fn put(&mut self, portfolio: Portfolio) {
        match self.position(portfolio.name(), portfolio.owner()) {
            Some(pos) => self.portfolios[pos] = portfolio,
            None => self.portfolios.push(portfolio),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Portfolio> {
        self.portfolios.iter()
    }

    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }

    fn position(&self, name: &str, owner: &str) -> Option<usize> {
        self.portfolios
            .iter()
            .position(|p| p.name() == name && p.owner() == owner)
    }
}

fn not_found(name: &str, owner: &str) -> ModelError {
    ModelError::PortfolioNotFound {
        name: name.to_string(),
        owner: owner.to_string(),
    }
}
