pub const APP_TITLE: &str = "MyShop \u{00b7} Products";
pub const PROMPT: &str = "> ";
pub const BOUNDARY_MESSAGE: &str =
    "Sorry, something went wrong while loading this page. Please try again later.";
pub const LISTING_COMPONENT: &str = "ProductsTable";
pub const EMPTY_MESSAGE: &str = "No products found.";
pub const LOADING_MESSAGE: &str = "Loading\u{2026}";
pub const SORT_ASC_MARK: &str = "\u{25b2}";
pub const SORT_DESC_MARK: &str = "\u{25bc}";

pub const HELP_TEXT: &str = "\
Commands:
  search <text>     search products (2+ characters; clears the category filter)
  type <text>       type text one character at a time into the search box
  clear             clear the search box
  category [slug]   filter by category (clears search); no slug removes the filter
  categories        list available categories
  sort <column>     sort by title|category|price|rating (repeat to toggle direction)
  page <n>          go to page n (1-based)
  next | prev       move one page
  rows <n>          rows per page (5, 10 or 25)
  help              show this help
  quit              exit";
