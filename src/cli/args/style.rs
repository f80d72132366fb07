use crate::error::Result;
use crate::pacman::conf::{self, PACMAN_CONF};
use crate::ui;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::Path;

pub fn apply(noconfirm: bool) -> Result<()> {
    let path = Path::new(PACMAN_CONF);
    let current = conf::read_conf(path)?;
    let styled = conf::apply_style(&current);

    if styled == current {
        println!("{}", ui::success("pacman.conf already has Color and ILoveCandy"));
        return Ok(());
    }

    if !noconfirm {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Enable Color and ILoveCandy in {}?", PACMAN_CONF))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", ui::warning("Cancelled"));
            return Ok(());
        }
    }

    conf::write_conf(path, &styled)?;
    println!("{}", ui::success("pacman.conf styled"));
    Ok(())
}
