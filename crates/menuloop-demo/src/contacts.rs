//! The address book and the operations the demo menu exposes.

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use menuloop_dispatch::Fault;
use menuloop_input::{Selector, TerminalIO, ValidatedReader};
use serde::Serialize;
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumIter, Display)]
pub enum Category {
    Family,
    Friend,
    Work,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub category: Category,
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}>\nPhone: {}\nCategory: {}",
            self.name, self.email, self.phone, self.category
        )
    }
}

/// Contacts shared between menu operations and the exit finalizer.
#[derive(Debug, Clone, Default)]
pub struct Book {
    contacts: Rc<RefCell<Vec<Contact>>>,
    favourites: Rc<RefCell<Vec<Contact>>>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.contacts.borrow().len()
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.contacts.borrow().clone()
    }

    pub fn favourites(&self) -> Vec<Contact> {
        self.favourites.borrow().clone()
    }

    pub fn add<T: TerminalIO>(&self, reader: &ValidatedReader<T>) -> Result<(), Fault> {
        let name = reader.name("Name")?;
        let email = reader.email("Email")?;
        let phone = reader.digits_between("Phone number", 7, 15)?;
        let category = Selector::new(reader).choose_variant::<Category>("Category")?;
        log::debug!("adding contact {}", name);
        self.contacts.borrow_mut().push(Contact {
            name,
            email,
            phone,
            category,
        });
        Ok(())
    }

    pub fn list<T: TerminalIO>(&self, reader: &ValidatedReader<T>) -> Result<(), Fault> {
        let contacts = self.contacts.borrow();
        if contacts.is_empty() {
            reader.say("The address book is empty.")?;
        }
        for contact in contacts.iter() {
            reader.say(&format!("{}\n", contact))?;
        }
        Ok(())
    }

    /// Show the contacts in one category.
    pub fn by_category<T: TerminalIO>(&self, reader: &ValidatedReader<T>) -> Result<(), Fault> {
        let category = Selector::new(reader).choose_variant::<Category>("Which category")?;
        let matching: Vec<_> = self
            .contacts
            .borrow()
            .iter()
            .filter(|c| c.category == category)
            .map(|c| c.name.clone())
            .collect();
        if matching.is_empty() {
            reader.say(&format!("No {} contacts.", category))?;
        } else {
            reader.say(&matching.join("\n"))?;
        }
        Ok(())
    }

    pub fn pick_favourite<T: TerminalIO>(&self, reader: &ValidatedReader<T>) -> Result<(), Fault> {
        let contact = Selector::new(reader).choose_one("Pick a favourite", self.contacts())?;
        reader.say(&format!("{} is now a favourite.", contact.name))?;
        let mut favourites = self.favourites.borrow_mut();
        if !favourites.contains(&contact) {
            favourites.push(contact);
        }
        Ok(())
    }

    /// Pick several contacts to email at once.
    pub fn group_email<T: TerminalIO>(&self, reader: &ValidatedReader<T>) -> Result<(), Fault> {
        let picked = Selector::new(reader).choose_many("Who should receive it", self.contacts())?;
        let to: Vec<_> = picked.iter().map(|c| c.email.as_str()).collect();
        reader.say(&format!("To: {}", to.join(", ")))?;
        Ok(())
    }

    pub fn import(&self, path: &Path) -> anyhow::Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut imported = 0;
        for (n, line) in text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
            let fields: Vec<_> = line.split(',').map(str::trim).collect();
            let [name, email, phone] = fields[..] else {
                anyhow::bail!("line {}: expected name,email,phone", n + 1);
            };
            self.contacts.borrow_mut().push(Contact {
                name: name.to_string(),
                email: email.to_lowercase(),
                phone: phone.to_string(),
                category: Category::Other,
            });
            imported += 1;
        }
        log::info!("imported {} contact(s) from {}", imported, path.display());
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), Fault> {
        let json = serde_json::to_string_pretty(&*self.contacts.borrow())?;
        fs::write(path, json)?;
        Ok(())
    }
}
