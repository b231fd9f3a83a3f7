//! Page-side scripts used by the step executors and the extraction phase.

use super::Script;

/// Empties an input so typed text replaces the previous value.
///
/// `arguments[0]`: CSS locator of the input.
pub const CLEAR_INPUT: Script = Script {
    name: "clear_input",
    source: r#"
const el = document.querySelector(arguments[0]);
if (!el) { return false; }
el.focus();
el.value = '';
el.dispatchEvent(new Event('input', { bubbles: true }));
return true;
"#,
};

/// Scrolls the first match into the middle of the viewport.
///
/// `arguments[0]`: CSS locator.
pub const SCROLL_INTO_VIEW: Script = Script {
    name: "scroll_into_view",
    source: r#"
const el = document.querySelector(arguments[0]);
if (!el) { return false; }
el.scrollIntoView({ behavior: 'auto', block: 'center' });
return true;
"#,
};

/// Writes guest counts into their numeric fields and fires change events so
/// the page's own logic picks them up.
///
/// `arguments`: adults locator, adults, children locator, children.
pub const SET_GUEST_COUNTS: Script = Script {
    name: "set_guest_counts",
    source: r#"
const assign = (selector, value) => {
  const el = document.querySelector(selector);
  if (!el) { return false; }
  el.value = String(value);
  el.dispatchEvent(new Event('input', { bubbles: true }));
  el.dispatchEvent(new Event('change', { bubbles: true }));
  return true;
};
return [assign(arguments[0], arguments[1]), assign(arguments[2], arguments[3])];
"#,
};

/// Reads every result card into `{name, price, rating, url}` objects.
///
/// `arguments[0]`: object with `card`, `title`, `price`, `rating` and `link`
/// locators. Missing fields come back as empty strings.
pub const EXTRACT_LISTINGS: Script = Script {
    name: "extract_listings",
    source: r#"
const sel = arguments[0];
const text = (card, selector) => {
  const el = card.querySelector(selector);
  return el && el.textContent ? el.textContent.trim() : '';
};
return Array.from(document.querySelectorAll(sel.card)).map((card) => {
  const link = card.querySelector(sel.link);
  return {
    name: text(card, sel.title),
    price: text(card, sel.price),
    rating: text(card, sel.rating),
    url: link && link.href ? link.href : '',
  };
});
"#,
};

/// `document.readyState`, used to poll for interactivity.
pub const READY_STATE: Script = Script {
    name: "ready_state",
    source: "return document.readyState;",
};
