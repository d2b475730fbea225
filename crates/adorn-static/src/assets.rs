//! Stylesheets and scripts shipped with the site.

/// Theme assets written by the builder.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The theme stylesheet.
    pub fn generate_css() -> String {
        THEME_CSS.to_string()
    }

    /// The theme script.
    pub fn generate_js() -> String {
        THEME_JS.to_string()
    }
}

const THEME_CSS: &str = r#"/* adorn docs theme */

:root {
  --sidebar-width: 260px;
  --toc-width: 220px;
  --content-max-width: 820px;
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #f6f8fa;
  --muted-foreground: #59636e;
  --border: #d1d9e0;
  --primary: #0969da;
  --code-background: #f6f8fa;
  --radius: 0.375rem;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

a {
  color: var(--primary);
  text-decoration: none;
}

a:hover {
  text-decoration: underline;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

/* Sidebar */
.sidebar {
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-logo {
  display: block;
  margin-bottom: 1.5rem;
  font-weight: 700;
  font-size: 1.125rem;
  color: var(--foreground);
}

.nav-list,
.nav-children {
  list-style: none;
  margin: 0;
  padding: 0;
}

.nav-children {
  padding-left: 1rem;
}

.nav-item a {
  display: block;
  padding: 0.25rem 0;
  color: var(--muted-foreground);
}

.nav-item.active > a {
  color: var(--primary);
  font-weight: 600;
}

/* Content */
.main {
  display: grid;
  grid-template-columns: minmax(0, var(--content-max-width)) var(--toc-width);
  gap: 2rem;
  padding: 2rem 3rem;
}

.content pre {
  background: var(--code-background);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
}

.content table {
  border-collapse: collapse;
}

.content th,
.content td {
  border: 1px solid var(--border);
  padding: 0.375rem 0.75rem;
}

/* Table of contents */
.toc {
  position: sticky;
  top: 2rem;
  align-self: start;
  font-size: 0.875rem;
}

.toc h2 {
  font-size: 0.75rem;
  text-transform: uppercase;
  color: var(--muted-foreground);
}

.toc ul {
  list-style: none;
  margin: 0;
  padding-left: 0.75rem;
}

.toc > ul {
  padding-left: 0;
}

.toc a {
  color: var(--muted-foreground);
}

@media (max-width: 1024px) {
  .layout,
  .main {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: static;
    height: auto;
  }

  .toc {
    display: none;
  }
}
"#;

const THEME_JS: &str = r#"// adorn docs theme
(function() {
  'use strict';

  // Highlight current nav item
  const currentPath = window.location.pathname;
  document.querySelectorAll('.nav-item a').forEach(link => {
    const href = link.getAttribute('href');
    if (href === currentPath) {
      link.parentElement.classList.add('active');
    }
  });

  // Copy button for code blocks
  document.querySelectorAll('.content pre').forEach(pre => {
    if (pre.querySelector('.copy-btn')) return;

    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.textContent = 'Copy';
    btn.setAttribute('type', 'button');

    btn.addEventListener('click', async () => {
      const source = pre.cloneNode(true);
      source.querySelectorAll('.copy-btn, .conum').forEach(el => el.remove());

      try {
        await navigator.clipboard.writeText(source.textContent || '');
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });

    pre.appendChild(btn);
  });
})();
"#;

/// Styles for normalized AsciiDoc output: admonitions, callout lists and
/// callout markers.
pub const ASCIIDOC_CSS: &str = r#"/* AsciiDoc content */

.admonition {
  margin: 1.25rem 0;
  padding: 0 1rem 0.75rem;
  border-left: 4px solid var(--admonition-color, #448aff);
  border-radius: 0.25rem;
  background: var(--admonition-background, rgba(68, 138, 255, 0.08));
}

.admonition-title {
  margin: 0 -1rem 0.75rem;
  padding: 0.5rem 1rem;
  font-weight: 700;
  background: var(--admonition-background, rgba(68, 138, 255, 0.08));
}

.admonition.note {
  --admonition-color: #448aff;
  --admonition-background: rgba(68, 138, 255, 0.1);
}

.admonition.tip {
  --admonition-color: #00bfa5;
  --admonition-background: rgba(0, 191, 165, 0.1);
}

.admonition.important {
  --admonition-color: #7c4dff;
  --admonition-background: rgba(124, 77, 255, 0.1);
}

.admonition.caution {
  --admonition-color: #ff9100;
  --admonition-background: rgba(255, 145, 0, 0.1);
}

.admonition.warning {
  --admonition-color: #ff5252;
  --admonition-background: rgba(255, 82, 82, 0.1);
}

/* Callout lists */
ol.colist {
  padding-left: 0;
  list-style: none;
  counter-reset: colist;
}

ol.colist > li {
  counter-increment: colist;
  position: relative;
  padding-left: 2rem;
}

ol.colist > li::before {
  content: counter(colist);
  position: absolute;
  left: 0;
  top: 0.2em;
  width: 1.3em;
  height: 1.3em;
  border-radius: 50%;
  font-size: 0.8em;
  line-height: 1.3em;
  text-align: center;
  color: #fff;
  background: var(--foreground, #1f2328);
}

/* Callout markers inside code, drawn from data-value so they never copy */
.listingblock pre .conum[data-value] {
  display: inline-block;
  width: 1.3em;
  height: 1.3em;
  border-radius: 50%;
  font-size: 0.75em;
  font-style: normal;
  line-height: 1.3em;
  text-align: center;
  color: #fff;
  background: var(--foreground, #1f2328);
  user-select: none;
  -webkit-user-select: none;
}

.listingblock pre .conum[data-value]::after {
  content: attr(data-value);
}

.listingblock pre .conum[data-value] + b {
  display: none;
}
"#;

/// Keeps callout markers out of copied code, like Antora does: markers are
/// removed from the selection before it reaches the clipboard.
pub const STRIP_CALLOUTS_JS: &str = r#"// Strip callout markers from copied code
(function() {
  'use strict';

  function stripped(fragment) {
    fragment.querySelectorAll('.conum, .conum + b').forEach(el => el.remove());
    return fragment.textContent.replace(/[ \t]+$/gm, '');
  }

  document.addEventListener('copy', event => {
    const selection = window.getSelection();
    if (!selection || selection.rangeCount === 0) return;

    const range = selection.getRangeAt(0);
    const node = range.commonAncestorContainer;
    const element = node.nodeType === Node.ELEMENT_NODE ? node : node.parentElement;
    if (!element || !element.closest('.listingblock pre')) return;

    const text = stripped(range.cloneContents());
    event.clipboardData.setData('text/plain', text);
    event.preventDefault();
  });
})();
"#;
